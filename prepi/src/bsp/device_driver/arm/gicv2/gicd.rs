// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2020-2023 Andre Richter <andre.o.richter@gmail.com>

//! GICD Driver - GIC Distributor.

use crate::bsp::device_driver::common::MMIODerefWrapper;
use tock_registers::{
    interfaces::{Readable, Writeable},
    register_bitfields, register_structs,
    registers::{ReadOnly, ReadWrite, WriteOnly},
};

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

register_bitfields! {
    u32,

    /// Distributor Control Register
    CTLR [
        Enable OFFSET(0) NUMBITS(1) []
    ],

    /// Interrupt Controller Type Register
    TYPER [
        ITLinesNumber OFFSET(0)  NUMBITS(5) []
    ]
}

register_structs! {
    #[allow(non_snake_case)]
    RegisterBlock {
        (0x000 => CTLR: ReadWrite<u32, CTLR::Register>),
        (0x004 => TYPER: ReadOnly<u32, TYPER::Register>),
        (0x008 => _reserved1),
        (0x180 => ICENABLER: [WriteOnly<u32>; 32]),
        (0x200 => _reserved2),
        (0x280 => ICPENDR: [WriteOnly<u32>; 32]),
        (0x300 => @END),
    }
}

/// Abstraction for the associated MMIO registers.
type Registers = MMIODerefWrapper<RegisterBlock>;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Representation of the GIC Distributor.
pub struct GICD {
    registers: Registers,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl GICD {
    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide a correct MMIO start address.
    pub const unsafe fn new(mmio_start_addr: usize) -> Self {
        Self {
            registers: Registers::new(mmio_start_addr),
        }
    }

    /// Return the number of IRQs that this HW implements.
    #[inline(always)]
    fn num_irqs(&self) -> usize {
        // Refer to GICv2 Architecture Specification, Section 4.3.2.
        ((self.registers.TYPER.read(TYPER::ITLinesNumber) as usize) + 1) * 32
    }

    /// Bring the distributor into the quiescent state: every interrupt source disabled, nothing
    /// pending, distributor running.
    ///
    /// A TYPER readback of all-zeroes past the architectural minimum means the block did not
    /// respond (wrong aperture, or the clock to it is off). That is the one failure this phase
    /// can detect, and it must be reported rather than papered over.
    pub fn boot_core_quiesce(&self) -> Result<(), &'static str> {
        let num_irqs = self.num_irqs();

        if self.registers.TYPER.get() == 0 {
            return Err("GIC distributor is not responding");
        }

        // One bit per interrupt source, 32 sources per register. Writing a set bit disables the
        // source respectively clears its pending state.
        for i in 0..(num_irqs / 32) {
            self.registers.ICENABLER[i].set(u32::MAX);
            self.registers.ICPENDR[i].set(u32::MAX);
        }

        self.registers.CTLR.write(CTLR::Enable::SET);

        Ok(())
    }
}
