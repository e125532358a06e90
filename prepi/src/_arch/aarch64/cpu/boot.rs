// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2021-2023 Andre Richter <andre.o.richter@gmail.com>

//! Architectural boot code.
//!
//! # Orientation
//!
//! Since arch modules are imported into generic modules using the path attribute, the path of this
//! file is:
//!
//! crate::cpu::boot::arch_boot

use core::arch::global_asm;

// Assembly counterpart to this file.
global_asm!(include_str!("boot.s"));

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// The Rust entry of the `prepi` binary.
///
/// The function is called from the assembly `_start` function, which hands over the extent of the
/// initial stack it established. The entry contract ends here: `sec_init()` is called exactly
/// once and never returns.
#[no_mangle]
pub unsafe extern "C" fn _start_rust(stack_base: usize, stack_size: usize) -> ! {
    crate::sec_init(stack_base, stack_size)
}
