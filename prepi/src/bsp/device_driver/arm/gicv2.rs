// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2020-2023 Andre Richter <andre.o.richter@gmail.com>

//! GICv2 Driver - ARM Generic Interrupt Controller v2.
//!
//! The Qualcomm QGIC is a standard GICv2 instantiation. In this phase, the controller is not used
//! to dispatch anything; the job is to leave it in a defined, quiescent state for the next stage:
//! every shared interrupt disabled at the distributor, the CPU interface's priority mask opened,
//! and both halves enabled so that the block is addressable. The core-level IRQ mask in `PSTATE`
//! stays set throughout, so nothing can fire meanwhile.
//!
//! # Glossary
//!   - SPI - Shared Peripheral Interrupt.

mod gicc;
mod gicd;

use crate::driver;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Representation of the GIC.
pub struct GICv2 {
    /// The Distributor.
    gicd: gicd::GICD,

    /// The CPU Interface.
    gicc: gicc::GICC,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl GICv2 {
    pub const COMPATIBLE: &'static str = "GICv2 (ARM Generic Interrupt Controller v2)";

    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide correct MMIO start addresses.
    pub const unsafe fn new(gicd_mmio_start_addr: usize, gicc_mmio_start_addr: usize) -> Self {
        Self {
            gicd: gicd::GICD::new(gicd_mmio_start_addr),
            gicc: gicc::GICC::new(gicc_mmio_start_addr),
        }
    }
}

//------------------------------------------------------------------------------
// OS Interface Code
//------------------------------------------------------------------------------

impl driver::interface::DeviceDriver for GICv2 {
    fn compatible(&self) -> &'static str {
        Self::COMPATIBLE
    }

    unsafe fn init(&self) -> Result<(), &'static str> {
        self.gicd.boot_core_quiesce()?;

        self.gicc.priority_accept_all();
        self.gicc.enable();

        Ok(())
    }
}
