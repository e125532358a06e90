// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! Architectural cache maintenance.
//!
//! # Orientation
//!
//! Since arch modules are imported into generic modules using the path attribute, the path of this
//! file is:
//!
//! crate::memory::cache::arch_cache

use core::arch::asm;

//--------------------------------------------------------------------------------------------------
// Private Code
//--------------------------------------------------------------------------------------------------

/// The smallest data cache line size implemented by any cache level, in bytes.
fn data_cache_line_size() -> usize {
    let ctr: u64;

    unsafe { asm!("mrs {ctr}, CTR_EL0", ctr = out(reg) ctr, options(nomem, nostack, preserves_flags)) };

    // CTR_EL0.DminLine is log2 of the number of words in the smallest line.
    let words_log2 = ((ctr >> 16) & 0b1111) as usize;

    4 << words_log2
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Invalidate the data cache over the given physical range, line by line.
///
/// Needed once per boot, before the firmware image range is scanned or executed: the caches may
/// hold stale lines populated while the reset vector and the trampoline ran with different memory
/// attributes.
///
/// # Safety
///
/// - Dirty lines in the range are discarded, not written back. The caller must be sure that
///   nothing in the range was legitimately written through the cache.
pub unsafe fn invalidate_data_cache_range(base: usize, size: usize) {
    let line_size = data_cache_line_size();

    let start = crate::common::align_down(base, line_size);
    let end_exclusive = base + size;

    // Writes must not be reordered around the maintenance operations.
    asm!("dsb sy");

    let mut addr = start;
    while addr < end_exclusive {
        asm!("dc ivac, {addr}", addr = in(reg) addr, options(nostack, preserves_flags));
        addr += line_size;
    }

    asm!("dsb sy", "isb sy");
}
