// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! Memory Management Unit.
//!
//! The board supplies a [`VirtMemLayout`] of special ranges (the boot image, device MMIO); the
//! architecture code compiles it into static translation tables and switches translation on.
//! Anything not covered by a special range translates as ordinary cacheable DRAM.

#[cfg(target_arch = "aarch64")]
#[path = "../_arch/aarch64/memory/mmu.rs"]
mod arch_mmu;

use core::ops::RangeInclusive;

//--------------------------------------------------------------------------------------------------
// Architectural Public Reexports
//--------------------------------------------------------------------------------------------------
pub use arch_mmu::GRANULE_SIZE;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Memory attributes of a mapped range.
#[derive(Copy, Clone)]
pub enum MemAttributes {
    /// Ordinary, cacheable DRAM.
    CacheableDRAM,

    /// Device memory; accesses are side-effecting and never cached.
    Device,
}

/// Access permissions of a mapped range.
#[derive(Copy, Clone)]
pub enum AccessPermissions {
    /// Read-only.
    ReadOnly,

    /// Read-write.
    ReadWrite,
}

/// Collection of memory attributes.
#[derive(Copy, Clone)]
pub struct AttributeFields {
    /// Memory type.
    pub mem_attributes: MemAttributes,

    /// Access permissions.
    pub acc_perms: AccessPermissions,

    /// Whether instruction fetches are forbidden.
    pub execute_never: bool,
}

/// A descriptor of one special memory range.
pub struct RangeDescriptor {
    /// Name for diagnostic output.
    pub name: &'static str,

    /// Evaluated lazily because linker symbols are only valid addresses at runtime.
    pub range: fn() -> RangeInclusive<usize>,

    /// Attributes of the range.
    pub attribute_fields: AttributeFields,
}

/// The board's memory layout from the MMU's point of view. Identity-mapped throughout; this phase
/// has no use for a distinct virtual address space, it only needs attributes and permissions to
/// apply.
pub struct VirtMemLayout<const NUM_SPECIAL_RANGES: usize> {
    /// The last valid address of the mapped space.
    max_addr_inclusive: usize,

    /// Array of descriptors for special ranges.
    inner: [RangeDescriptor; NUM_SPECIAL_RANGES],
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl Default for AttributeFields {
    fn default() -> AttributeFields {
        AttributeFields {
            mem_attributes: MemAttributes::CacheableDRAM,
            acc_perms: AccessPermissions::ReadWrite,
            execute_never: true,
        }
    }
}

impl<const NUM_SPECIAL_RANGES: usize> VirtMemLayout<{ NUM_SPECIAL_RANGES }> {
    /// Create a new instance.
    pub const fn new(max: usize, layout: [RangeDescriptor; NUM_SPECIAL_RANGES]) -> Self {
        Self {
            max_addr_inclusive: max,
            inner: layout,
        }
    }

    /// The last valid address of the mapped space.
    pub fn max_addr_inclusive(&self) -> usize {
        self.max_addr_inclusive
    }

    /// For a given address, return the memory attributes to map it with.
    ///
    /// If the address is not covered by a special range, return the default for normal cacheable
    /// DRAM.
    pub fn attributes_for(&self, addr: usize) -> Result<AttributeFields, &'static str> {
        if addr > self.max_addr_inclusive {
            return Err("Address out of range");
        }

        for i in self.inner.iter() {
            if (i.range)().contains(&addr) {
                return Ok(i.attribute_fields);
            }
        }

        Ok(AttributeFields::default())
    }

    /// Print the layout for diagnostic purposes.
    pub fn print_layout(&self) {
        use crate::info;

        for i in self.inner.iter() {
            let range = (i.range)();

            info!(
                "      {:#010x} - {:#010x} | {}",
                range.start(),
                range.end(),
                i.name
            );
        }
    }
}

/// Build and activate virtual-to-physical mappings.
///
/// The board layout is compiled into the architecture's static tables. The firmware pool must be
/// covered by the mapped space; this is the one cross-check the orchestration depends on, so it
/// is validated here rather than assumed.
///
/// # Safety
///
/// - Changes the HW's global state.
/// - Must only be called once.
pub unsafe fn enable_mmu_and_caching(
    pool: &crate::memory::MemoryRegion,
) -> Result<(), &'static str> {
    let layout = crate::bsp::memory::mmu::virt_mem_layout();

    if (pool.end_exclusive() - 1) > layout.max_addr_inclusive() {
        return Err("Firmware pool exceeds the mapped address space");
    }

    arch_mmu::enable()
}
