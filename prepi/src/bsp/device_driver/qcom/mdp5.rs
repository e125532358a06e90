// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! MDP5 display pipe driver.
//!
//! The vendor bootloader leaves the panel powered and the display controller scanning out a
//! splash framebuffer. This driver does the minimum to make that framebuffer ours: blank it,
//! then reprogram the source pipe for the BGRA layout and stride the firmware renders with, and
//! flush the new configuration into the hardware.
//!
//! Full modesetting belongs to the display stack of a much later boot stage; this phase only
//! needs a predictable canvas for diagnostics.

use crate::{
    bsp::device_driver::common::MMIODerefWrapper,
    driver, memory,
    memory::MemoryRegion,
};
use tock_registers::{
    interfaces::{Readable, Writeable},
    register_bitfields, register_structs,
    registers::{ReadOnly, ReadWrite},
};

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

register_bitfields! {
    u32,

    /// CTL path flush trigger. Committing a bit makes the double-buffered pipe registers take
    /// effect at the next vsync.
    FLUSH [
        RGB0 OFFSET(3) NUMBITS(1) []
    ]
}

// Source pipe (SSPP) registers of the RGB0 pipe.
register_structs! {
    #[allow(non_snake_case)]
    SsppRegisterBlock {
        (0x000 => _reserved1),
        (0x024 => SRC_YSTRIDE: ReadWrite<u32>),
        (0x028 => _reserved2),
        (0x030 => SRC_FORMAT: ReadWrite<u32>),
        (0x034 => SRC_UNPACK_PATTERN: ReadWrite<u32>),
        (0x038 => @END),
    }
}

// Control path registers.
register_structs! {
    #[allow(non_snake_case)]
    CtlRegisterBlock {
        (0x000 => _reserved1),
        (0x018 => FLUSH: ReadWrite<u32, FLUSH::Register>),
        (0x01C => @END),
    }
}

// Top-level MDP registers.
register_structs! {
    #[allow(non_snake_case)]
    MdpRegisterBlock {
        (0x0000 => _reserved1),
        (0x1000 => HW_REV: ReadOnly<u32>),
        (0x1004 => @END),
    }
}

type SsppRegisters = MMIODerefWrapper<SsppRegisterBlock>;
type CtlRegisters = MMIODerefWrapper<CtlRegisterBlock>;
type MdpRegisters = MMIODerefWrapper<MdpRegisterBlock>;

/// BGRA 8:8:8:8, as the panel expects it.
const SRC_FORMAT_BGRA8888: u32 = 0x0002_36FF;

/// Unpack order B, G, R, A.
const UNPACK_PATTERN_BGRA: u32 = 0x0302_0001;

const BYTES_PER_PIXEL: u32 = 4;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Representation of the display pipe.
pub struct Mdp5 {
    mdp_registers: MdpRegisters,
    sspp_registers: SsppRegisters,
    ctl_registers: CtlRegisters,

    /// The scanout framebuffer.
    framebuffer: MemoryRegion,

    /// Visible width in pixels.
    frame_width: u32,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl Mdp5 {
    pub const COMPATIBLE: &'static str = "Qualcomm MDP5";

    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide correct MMIO start addresses and a correct framebuffer
    ///   region.
    pub const unsafe fn new(
        mdp_mmio_start_addr: usize,
        sspp_mmio_start_addr: usize,
        ctl_mmio_start_addr: usize,
        framebuffer: MemoryRegion,
        frame_width: u32,
    ) -> Self {
        Self {
            mdp_registers: MdpRegisters::new(mdp_mmio_start_addr),
            sspp_registers: SsppRegisters::new(sspp_mmio_start_addr),
            ctl_registers: CtlRegisters::new(ctl_mmio_start_addr),
            framebuffer,
            frame_width,
        }
    }

    /// The display block's hardware revision ID.
    pub fn hw_revision(&self) -> u32 {
        self.mdp_registers.HW_REV.get()
    }

    /// Blank the framebuffer and commit the source pipe configuration.
    ///
    /// Exactly four register writes, in this order: stride, source format, unpack pattern,
    /// flush. The stride derives from the configured frame width.
    fn blank_and_configure(&self) {
        // Clear every byte of the frame so the panel shows black instead of the vendor splash.
        let fb = self.framebuffer.base as *mut u8;
        unsafe { memory::zero_volatile(fb..fb.add(self.framebuffer.size)) };

        self.sspp_registers
            .SRC_YSTRIDE
            .set(self.frame_width * BYTES_PER_PIXEL);
        self.sspp_registers.SRC_FORMAT.set(SRC_FORMAT_BGRA8888);
        self.sspp_registers
            .SRC_UNPACK_PATTERN
            .set(UNPACK_PATTERN_BGRA);

        self.ctl_registers.FLUSH.write(FLUSH::RGB0::SET);
    }
}

//------------------------------------------------------------------------------
// OS Interface Code
//------------------------------------------------------------------------------

impl driver::interface::DeviceDriver for Mdp5 {
    fn compatible(&self) -> &'static str {
        Self::COMPATIBLE
    }

    unsafe fn init(&self) -> Result<(), &'static str> {
        self.blank_and_configure();

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use test_macros::kernel_test;

    /// An in-memory register file standing in for the hardware.
    #[repr(align(4096))]
    struct RegisterFile {
        mdp: [u32; 0x1004 / 4],
        sspp: [u32; 0x38 / 4],
        ctl: [u32; 0x1C / 4],
        fb: [u8; 64],
    }

    /// The init sequence is exactly the documented write set: four registers plus the blanked
    /// framebuffer.
    #[kernel_test]
    fn init_performs_documented_write_set() {
        static mut REGS: RegisterFile = RegisterFile {
            mdp: [0; 0x1004 / 4],
            sspp: [0; 0x38 / 4],
            ctl: [0; 0x1C / 4],
            fb: [0xFF; 64],
        };

        let mdp = unsafe {
            Mdp5::new(
                REGS.mdp.as_ptr() as usize,
                REGS.sspp.as_ptr() as usize,
                REGS.ctl.as_ptr() as usize,
                MemoryRegion::new(REGS.fb.as_ptr() as usize, REGS.fb.len()),
                720,
            )
        };

        unsafe { crate::driver::interface::DeviceDriver::init(&mdp).unwrap() };

        unsafe {
            assert_eq!(REGS.sspp[0x24 / 4], 720 * 4);
            assert_eq!(REGS.sspp[0x30 / 4], 0x0002_36FF);
            assert_eq!(REGS.sspp[0x34 / 4], 0x0302_0001);
            assert_eq!(REGS.ctl[0x18 / 4], 1 << 3);

            // No other pipe register was touched.
            assert!(REGS.sspp[..0x24 / 4].iter().all(|&x| x == 0));
            assert!(REGS.ctl[..0x18 / 4].iter().all(|&x| x == 0));

            // The frame is blanked.
            assert!(REGS.fb.iter().all(|&x| x == 0));
        }
    }
}
