// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! BSP Memory Management Unit.

use crate::memory::mmu::*;
use core::ops::RangeInclusive;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// The number of special ranges in the layout below.
pub const NUM_MEM_RANGES: usize = 2;

//--------------------------------------------------------------------------------------------------
// Global instances
//--------------------------------------------------------------------------------------------------

/// The virtual memory layout.
///
/// Contains only special ranges; everything else in the address space translates as normal
/// cacheable DRAM, including physical addresses that no DRAM backs. A wild access to an
/// unbacked address will fault in hardware instead of in the page tables.
static LAYOUT: VirtMemLayout<NUM_MEM_RANGES> = VirtMemLayout::new(
    super::map::END_INCLUSIVE,
    [
        RangeDescriptor {
            name: "Boot image code and RO data",
            range: || {
                // The linker script keeps the RO area consecutive and granule aligned, and
                // exports the boundaries:
                //
                // [__image_start, __ro_end_exclusive)
                RangeInclusive::new(super::image_start(), super::ro_end_exclusive() - 1)
            },
            attribute_fields: AttributeFields {
                mem_attributes: MemAttributes::CacheableDRAM,
                acc_perms: AccessPermissions::ReadOnly,
                execute_never: false,
            },
        },
        RangeDescriptor {
            name: "Device MMIO",
            range: || RangeInclusive::new(0x0000_0000, super::map::mmio::END_INCLUSIVE),
            attribute_fields: AttributeFields {
                mem_attributes: MemAttributes::Device,
                acc_perms: AccessPermissions::ReadWrite,
                execute_never: true,
            },
        },
    ],
);

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// The size of the mapped address space.
pub const fn addr_space_size() -> usize {
    super::map::END_INCLUSIVE + 1
}

/// Return a reference to the virtual memory layout.
pub fn virt_mem_layout() -> &'static VirtMemLayout<NUM_MEM_RANGES> {
    &LAYOUT
}
