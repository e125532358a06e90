// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! Memory Management.
//!
//! The centerpiece of this module is the memory plan: a pure computation that turns the board's
//! fixed configuration values into the four physical regions the rest of the boot relies on.
//!
//! The derivation is:
//!
//! +---------------------------------------+
//! |                                       | system memory base
//! | Pre-allocated region                  |
//! |                                       |   (vendor carve-outs, framebuffer, this image)
//! +---------------------------------------+
//! |                                       | pool base = system base + pre-allocated size
//! | Firmware pool                         |
//! |   [handoff block grows upward]        |
//! |   [page allocations grow downward]    |
//! |                                       |
//! |   Boot stack (topmost stack_size)     | stack base = pool base + pool size - stack size
//! +---------------------------------------+
//! |                                       | pool end
//! | Rest of system memory                 |
//! |                                       |   (untouched in this phase)
//! +---------------------------------------+
//!
//! Nothing in here performs I/O, so the arithmetic and all of its rejection paths are unit
//! testable.

pub mod cache;
pub mod mmu;

use core::ops::Range;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// A contiguous region of physical memory.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct MemoryRegion {
    /// First byte of the region.
    pub base: usize,

    /// Size in bytes.
    pub size: usize,
}

/// The configuration scalars the memory plan is computed from.
///
/// Constructed once by the board code, read-only ever after.
#[derive(Copy, Clone)]
pub struct LayoutConfig {
    /// Physical base of system DRAM.
    pub sys_mem_base: usize,

    /// Size of system DRAM.
    pub sys_mem_size: usize,

    /// Size of the region at the bottom of DRAM that is reserved before this phase runs.
    pub prealloc_size: usize,

    /// Size of the firmware pool that this phase and its successors allocate from.
    pub pool_size: usize,
}

/// The computed physical memory layout of the boot.
#[derive(Copy, Clone, Debug)]
pub struct BootLayout {
    /// All of system DRAM.
    pub system: MemoryRegion,

    /// Reserved for firmware-internal use; never exposed to later stages as general-purpose
    /// memory.
    pub prealloc: MemoryRegion,

    /// The arena the rest of boot is carved from, handoff block included.
    pub pool: MemoryRegion,

    /// The boot core's stack, taken from the top of the pool.
    pub stack: MemoryRegion,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl MemoryRegion {
    /// Create an instance.
    pub const fn new(base: usize, size: usize) -> Self {
        Self { base, size }
    }

    /// Address of the first byte after the region.
    pub const fn end_exclusive(&self) -> usize {
        self.base + self.size
    }

    /// Whether `other` lies completely within this region.
    pub const fn contains_region(&self, other: &MemoryRegion) -> bool {
        other.base >= self.base && other.end_exclusive() <= self.end_exclusive()
    }
}

/// Compute the boot memory layout from the configuration scalars.
///
/// Pure and deterministic. The preconditions that the original firmware design left implicit are
/// validated here, because getting them wrong means silently handing out overlapping regions:
///
/// - The pre-allocated region and the pool must both fit inside system memory.
/// - The stack must fit inside the pool (`stack_base >= pool_base`).
/// - The pool base must be aligned to the translation granule, since the MMU maps it wholesale.
pub fn plan(config: &LayoutConfig, stack_size: usize) -> Result<BootLayout, &'static str> {
    let system = MemoryRegion::new(config.sys_mem_base, config.sys_mem_size);
    let prealloc = MemoryRegion::new(config.sys_mem_base, config.prealloc_size);

    let pool = MemoryRegion::new(prealloc.end_exclusive(), config.pool_size);

    if !system.contains_region(&prealloc) {
        return Err("Pre-allocated region exceeds system memory");
    }

    if !system.contains_region(&pool) {
        return Err("Firmware pool exceeds system memory");
    }

    if !crate::common::is_aligned(pool.base, mmu::GRANULE_SIZE) {
        return Err("Firmware pool base not granule aligned");
    }

    if stack_size == 0 || stack_size > pool.size {
        return Err("Stack does not fit into the firmware pool");
    }

    let stack = MemoryRegion::new(pool.end_exclusive() - stack_size, stack_size);

    Ok(BootLayout {
        system,
        prealloc,
        pool,
        stack,
    })
}

/// Zero out a memory region.
///
/// # Safety
///
/// - `range.start` and `range.end` must be valid.
/// - `range.start` and `range.end` must be `T` aligned.
pub unsafe fn zero_volatile<T>(range: Range<*mut T>)
where
    T: From<u8>,
{
    let mut ptr = range.start;

    while ptr < range.end {
        core::ptr::write_volatile(ptr, T::from(0));
        ptr = ptr.offset(1);
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use test_macros::kernel_test;

    const fn config(
        sys_mem_base: usize,
        sys_mem_size: usize,
        prealloc_size: usize,
        pool_size: usize,
    ) -> LayoutConfig {
        LayoutConfig {
            sys_mem_base,
            sys_mem_size,
            prealloc_size,
            pool_size,
        }
    }

    /// The documented derivation, on a representative configuration.
    #[kernel_test]
    fn plan_derives_documented_layout() {
        let c = config(0, 0x2000_0000, 0x10_0000, 0x100_0000);

        let layout = plan(&c, 0x1_0000).unwrap();

        assert_eq!(layout.pool.base, 0x10_0000);
        assert_eq!(layout.pool.size, 0x100_0000);
        assert_eq!(layout.stack.base, 0x10F_0000);
        assert_eq!(layout.stack.size, 0x1_0000);
        assert!(layout.pool.contains_region(&layout.stack));
    }

    /// `zero_volatile()` works.
    #[kernel_test]
    fn zero_volatile_works() {
        let mut x: [usize; 3] = [10, 11, 12];
        let x_range = x.as_mut_ptr_range();

        unsafe { zero_volatile(x_range) };

        assert_eq!(x, [0, 0, 0]);
    }

    /// A stack bigger than the pool is a configuration error, not an overflow.
    #[kernel_test]
    fn plan_rejects_oversized_stack() {
        let c = config(0, 0x2000_0000, 0x10_0000, 0x100_0000);

        assert!(plan(&c, 0x100_0001).is_err());
        assert!(plan(&c, 0).is_err());
    }

    /// Regions that do not fit into system memory are rejected.
    #[kernel_test]
    fn plan_rejects_out_of_bounds_regions() {
        // Pool ends past the end of system memory.
        let c = config(0x8000_0000, 0x1000_0000, 0x800_0000, 0x900_0000);
        assert!(plan(&c, 0x1_0000).is_err());

        // Pre-allocated region alone exceeds system memory.
        let c = config(0x8000_0000, 0x1000_0000, 0x2000_0000, 0x100_0000);
        assert!(plan(&c, 0x1_0000).is_err());
    }

    /// A misaligned pool base is rejected before the MMU ever sees it.
    #[kernel_test]
    fn plan_rejects_misaligned_pool() {
        let c = config(0x8000_0000, 0x2000_0000, 0x1000, 0x100_0000);

        assert!(plan(&c, 0x1_0000).is_err());
    }
}
