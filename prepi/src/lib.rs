// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

// Rust embedded logo for `make doc`.
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/rust-embedded/wg/master/assets/logo/ewg-logo-blue-white-on-transparent.png"
)]

//! The `prepi` library.
//!
//! Used to compose the final boot-phase binary. `prepi` is the first mask-ROM-independent code
//! that runs on the application processor after the vendor secondary bootloader hands off. It owns
//! the window between "reset state, no services" and "core stage running":
//!
//! 1. Enable the CPU features C-level code relies on.
//! 2. Bring up the diagnostic output path (display pipe + serial console).
//! 3. Plan the physical memory layout and publish it through the handoff block.
//! 4. Invalidate stale cache lines over the firmware image, then switch on the MMU.
//! 5. Quiesce the interrupt controller.
//! 6. Decompress the embedded firmware volume and transfer control to the core stage.
//!
//! Every step is either a direct MMIO access or a call into a subsystem that the previous steps
//! just initialized; the order of operations in `main.rs` is part of the contract.
//!
//! # Code organization and architecture
//!
//! The code is divided into different *modules*, each representing a typical **subsystem** of the
//! boot phase. Top-level module files of subsystems reside directly in the `src` folder. For
//! example, `src/memory.rs` contains code that is concerned with all things memory.
//!
//! ## Visibility of processor architecture code
//!
//! Some subsystems depend on low-level code that is specific to the target processor
//! architecture. For each supported processor architecture, there exists a subfolder in
//! `src/_arch`, for example, `src/_arch/aarch64`.
//!
//! The architecture folders mirror the subsystem modules laid out in `src`. For example,
//! architectural code that belongs to the MMU subsystem (`src/memory/mmu.rs`) goes into
//! `src/_arch/aarch64/memory/mmu.rs`. The latter file is loaded as a module in
//! `src/memory/mmu.rs` using the `path attribute`. Usually, the chosen module name is the generic
//! module's name prefixed with `arch_`.
//!
//! ## BSP code
//!
//! `BSP` stands for Board Support Package. `BSP` code is organized under `src/bsp.rs` and
//! contains target board specific definitions and functions. These are things such as the board's
//! memory map, the boot configuration table, or instances of drivers for devices that are
//! featured on the respective board.
//!
//! # Boot flow
//!
//! 1. The phase entry point is the function `cpu::boot::arch_boot::_start()`.
//!     - It is implemented in `src/_arch/__arch_name__/cpu/boot.s`.
//! 2. Once finished with architectural setup, the arch code calls `sec_init()`, passing the
//!    location and size of the initial stack that the trampoline established.

#![allow(clippy::upper_case_acronyms)]
#![feature(format_args_nl)]
#![feature(linkage)]
#![no_std]
// Testing
#![cfg_attr(test, no_main)]
#![feature(custom_test_frameworks)]
#![reexport_test_harness_main = "test_main"]
#![test_runner(crate::test_runner)]

mod panic_wait;
mod synchronization;

pub mod bsp;
pub mod common;
pub mod console;
pub mod constructors;
pub mod cpu;
pub mod driver;
pub mod fv;
pub mod handoff;
pub mod loader;
pub mod memory;
pub mod print;
pub mod state;

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Version string.
pub fn version() -> &'static str {
    concat!(
        env!("CARGO_PKG_NAME"),
        " version ",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(not(test))]
extern "Rust" {
    fn sec_init(stack_base: usize, stack_size: usize) -> !;
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

/// The default runner for unit tests.
pub fn test_runner(tests: &[&test_types::UnitTest]) {
    // This line will be printed as the test header.
    println!("Running {} tests", tests.len());

    for (i, test) in tests.iter().enumerate() {
        print!("{:>3}. {:.<58}", i + 1, test.name);

        // Run the actual test.
        (test.test_func)();

        // Failed tests call panic!(). Execution reaches here only if the test has passed.
        println!("[ok]")
    }
}

/// The `sec_init()` for unit tests.
#[cfg(test)]
#[no_mangle]
unsafe fn sec_init(_stack_base: usize, _stack_size: usize) -> ! {
    bsp::driver::qemu_bring_up_console();

    test_main();

    cpu::qemu_exit_success()
}
