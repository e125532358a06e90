// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! BSP Memory Management.
//!
//! The physical memory layout.
//!
//! The vendor secondary bootloader initializes DRAM at 0x8000_0000 and jumps to this image at
//! the firmware device base, which lies inside the pre-allocated region together with the other
//! vendor carve-outs and the splash framebuffer.
//!
//! +---------------------------------------+
//! |                                       | 0x8000_0000, system memory base
//! | Pre-allocated region                  |
//! |   (SMEM/TZ carve-outs)                |
//! |                                       |
//! |   Framebuffer                         | 0x8DD0_1000
//! |                                       |
//! |   Firmware device (this image +      | 0x8F20_0000
//! |    compressed firmware volume)        |
//! |                                       |
//! +---------------------------------------+
//! |                                       | 0x9000_0000, firmware pool base
//! | Firmware pool                         |
//! |                                       |
//! +---------------------------------------+ 0xA000_0000
//! |                                       |
//! | Rest of DRAM                          |
//! +---------------------------------------+ 0xC000_0000

pub mod mmu;

use crate::memory::{LayoutConfig, MemoryRegion};
use core::cell::UnsafeCell;

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

// Symbols from the linker script.
extern "Rust" {
    static __image_start: UnsafeCell<()>;
    static __ro_end_exclusive: UnsafeCell<()>;
    static __image_end_exclusive: UnsafeCell<()>;
}

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// The board's physical memory map.
#[rustfmt::skip]
pub(super) mod map {
    /// The inclusive end address of the memory map.
    ///
    /// End address + 1 must be a power of two, because the MMU driver sizes its address space
    /// with it. 4 GiB covers DRAM and all peripherals in one take.
    pub const END_INCLUSIVE:       usize = 0xFFFF_FFFF;

    pub const SYS_MEM_START:       usize = 0x8000_0000;
    pub const SYS_MEM_SIZE:        usize = 0x4000_0000;

    /// Everything below the firmware pool is claimed before this phase runs.
    pub const PREALLOC_SIZE:       usize = 0x1000_0000;

    /// The arena this phase and its successors allocate from.
    pub const POOL_SIZE:           usize = 0x1000_0000;

    /// Scanout buffer, inherited from the vendor bootloader's splash setup.
    pub const FRAMEBUFFER_START:   usize = 0x8DD0_1000;
    pub const FRAMEBUFFER_SIZE:    usize = 0x0140_0000;

    /// The flash-shadow region this image and its companion volume were loaded to.
    pub const FD_START:            usize = 0x8F20_0000;
    pub const FD_SIZE:             usize = 0x00C0_0000;

    /// Physical devices.
    pub mod mmio {
        pub const MDP5_START:            usize = 0x01A0_0000;
        pub const MDP5_CTL0_START:       usize = 0x01A0_2000;
        pub const MDP5_RGB0_SSPP_START:  usize = 0x01A1_5000;
        pub const UART_DM_START:         usize = 0x078B_0000;
        pub const GICD_START:            usize = 0x0B00_0000;
        pub const GICC_START:            usize = 0x0B00_2000;
        pub const END_INCLUSIVE:         usize = 0x0FFF_FFFF;
    }
}

/// Visible width of the panel in pixels.
pub const FRAME_WIDTH_PIXELS: u32 = 720;

/// Size of the CPU's memory-mapped I/O space as reported in the handoff CPU record. Zero: this
/// SoC has no port-I/O concept.
pub const CPU_IO_SPACE_BITS: u8 = 0;

//--------------------------------------------------------------------------------------------------
// Global instances
//--------------------------------------------------------------------------------------------------

/// The boot configuration table. Constructed at build time, read-only forever.
static BOOT_CONFIG: LayoutConfig = LayoutConfig {
    sys_mem_base: map::SYS_MEM_START,
    sys_mem_size: map::SYS_MEM_SIZE,
    prealloc_size: map::PREALLOC_SIZE,
    pool_size: map::POOL_SIZE,
};

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Return a reference to the boot configuration table.
pub fn boot_config() -> &'static LayoutConfig {
    &BOOT_CONFIG
}

/// The firmware device region.
pub fn firmware_device() -> MemoryRegion {
    MemoryRegion::new(map::FD_START, map::FD_SIZE)
}

/// Start address of this image.
///
/// # Safety
///
/// - Value is provided by the linker script and must be trusted as-is.
#[inline(always)]
pub fn image_start() -> usize {
    unsafe { __image_start.get() as usize }
}

/// Exclusive end address of this image's read-only area.
///
/// # Safety
///
/// - Value is provided by the linker script and must be trusted as-is.
#[inline(always)]
pub(super) fn ro_end_exclusive() -> usize {
    unsafe { __ro_end_exclusive.get() as usize }
}

/// Exclusive end address of this image, including data and bss. The compressed firmware volume
/// sits at the next 8-byte boundary behind it.
///
/// # Safety
///
/// - Value is provided by the linker script and must be trusted as-is.
#[inline(always)]
pub fn image_end() -> usize {
    crate::common::align_up(unsafe { __image_end_exclusive.get() as usize }, 8)
}
