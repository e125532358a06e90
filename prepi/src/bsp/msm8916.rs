// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! Top-level BSP file for MSM8916-class boards.

pub mod cpu;
pub mod driver;
pub mod memory;
pub mod platform;

use super::device_driver;
use crate::memory::MemoryRegion;

//--------------------------------------------------------------------------------------------------
// Global instances
//--------------------------------------------------------------------------------------------------

static MDP5: device_driver::Mdp5 = unsafe {
    device_driver::Mdp5::new(
        memory::map::mmio::MDP5_START,
        memory::map::mmio::MDP5_RGB0_SSPP_START,
        memory::map::mmio::MDP5_CTL0_START,
        MemoryRegion::new(memory::map::FRAMEBUFFER_START, memory::map::FRAMEBUFFER_SIZE),
        memory::FRAME_WIDTH_PIXELS,
    )
};

static UART_DM: device_driver::UartDm =
    unsafe { device_driver::UartDm::new(memory::map::mmio::UART_DM_START) };

static INTERRUPT_CONTROLLER: device_driver::GICv2 = unsafe {
    device_driver::GICv2::new(memory::map::mmio::GICD_START, memory::map::mmio::GICC_START)
};

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Board identification.
pub fn board_name() -> &'static str {
    "MSM8916"
}
