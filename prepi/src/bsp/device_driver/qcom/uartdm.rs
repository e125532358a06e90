// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! UART_DM driver.
//!
//! The BLSP UART_DM is the serial console of MSM8916-class SoCs. The vendor bootloader has
//! already set up the clocks and the baud rate, so bring-up here is a reset of the FIFO state
//! machine plus re-enabling both directions.
//!
//! TX uses the register-packing mode, one character per word: announce a one-character packet via
//! `NCF_TX`, then push the character through the TX FIFO window. Everything is busy-waiting on
//! the status register; there is nothing else to do on the one core this early.

use crate::{
    console, cpu, driver,
    synchronization,
    synchronization::NullLock,
};
use core::fmt;
use tock_registers::{
    interfaces::{Readable, Writeable},
    register_bitfields, register_structs,
    registers::{ReadOnly, WriteOnly},
};

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

// UART_DM registers.
//
// Descriptions taken from the register layout used by the Qualcomm BLSP-attached UART_DM v1.4
// cores.
register_bitfields! {
    u32,

    /// Status Register
    SR [
        /// Receiver has at least one character.
        RXRDY OFFSET(0) NUMBITS(1) [],

        /// Transmit FIFO has room.
        TXRDY OFFSET(2) NUMBITS(1) [],

        /// Transmitter is completely drained.
        TXEMT OFFSET(3) NUMBITS(1) [],

        /// Receiver overrun occurred.
        UART_OVERRUN OFFSET(4) NUMBITS(1) []
    ],

    /// Command Register
    CR [
        /// General command field.
        CMD OFFSET(4) NUMBITS(4) [
            ResetReceiver = 1,
            ResetTransmitter = 2,
            ResetErrorStatus = 3
        ],

        /// Transmitter enable.
        TX_EN OFFSET(2) NUMBITS(1) [],

        /// Receiver enable.
        RX_EN OFFSET(0) NUMBITS(1) []
    ]
}

register_structs! {
    #[allow(non_snake_case)]
    pub RegisterBlock {
        (0x000 => MR1: WriteOnly<u32>),
        (0x004 => MR2: WriteOnly<u32>),
        (0x008 => _reserved1),
        (0x03C => DMEN: WriteOnly<u32>),
        (0x040 => NCF_TX: WriteOnly<u32>),
        (0x044 => _reserved2),
        (0x0A0 => CSR: WriteOnly<u32>),
        (0x0A4 => SR: ReadOnly<u32, SR::Register>),
        (0x0A8 => CR: WriteOnly<u32, CR::Register>),
        (0x0AC => _reserved3),
        (0x0B0 => IMR: WriteOnly<u32>),
        (0x0B4 => ISR: ReadOnly<u32>),
        (0x0B8 => _reserved4),
        (0x100 => TF: WriteOnly<u32>),
        (0x104 => _reserved5),
        (0x140 => RF: ReadOnly<u32>),
        (0x144 => @END),
    }
}

/// Abstraction for the associated MMIO registers.
type Registers =
    crate::bsp::device_driver::common::MMIODerefWrapper<RegisterBlock>;

struct UartDmInner {
    registers: Registers,
    chars_written: usize,
}

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Representation of the UART.
pub struct UartDm {
    inner: NullLock<UartDmInner>,
}

//--------------------------------------------------------------------------------------------------
// Private Code
//--------------------------------------------------------------------------------------------------

impl UartDmInner {
    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide a correct MMIO start address.
    const unsafe fn new(mmio_start_addr: usize) -> Self {
        Self {
            registers: Registers::new(mmio_start_addr),
            chars_written: 0,
        }
    }

    /// Reset the FIFO state machines and enable both directions.
    ///
    /// Baud rate and clocks are inherited from the vendor bootloader.
    fn init(&mut self) {
        self.registers.IMR.set(0); // No interrupts; everything is polled.

        self.registers.CR.write(CR::CMD::ResetReceiver);
        self.registers.CR.write(CR::CMD::ResetTransmitter);
        self.registers.CR.write(CR::CMD::ResetErrorStatus);

        self.registers.CR.write(CR::TX_EN::SET + CR::RX_EN::SET);
    }

    /// Send a character.
    fn write_char(&mut self, c: char) {
        // Spin until the transmit FIFO has room.
        while !self.registers.SR.matches_all(SR::TXRDY::SET) {
            cpu::nop();
        }

        // Announce a one-character packet, then push it.
        self.registers.NCF_TX.set(1);
        self.registers.TF.set(c as u32);

        self.chars_written += 1;
    }

    /// Block until the last character has left the transmitter.
    fn flush(&self) {
        while !self.registers.SR.matches_all(SR::TXEMT::SET) {
            cpu::nop();
        }
    }
}

/// Implementing `core::fmt::Write` enables usage of the `format_args!` macros, which in turn are
/// used to implement the `print!` and `println!` macros. By implementing `write_str()`, we get
/// `write_fmt()` automatically.
impl fmt::Write for UartDmInner {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            // Convert newline to carriage return + newline.
            if c == '\n' {
                self.write_char('\r');
            }

            self.write_char(c);
        }

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl UartDm {
    pub const COMPATIBLE: &'static str = "Qualcomm UART_DM";

    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide a correct MMIO start address.
    pub const unsafe fn new(mmio_start_addr: usize) -> Self {
        Self {
            inner: NullLock::new(UartDmInner::new(mmio_start_addr)),
        }
    }
}

//------------------------------------------------------------------------------
// OS Interface Code
//------------------------------------------------------------------------------
use synchronization::interface::Mutex;

impl driver::interface::DeviceDriver for UartDm {
    fn compatible(&self) -> &'static str {
        Self::COMPATIBLE
    }

    unsafe fn init(&self) -> Result<(), &'static str> {
        self.inner.lock(|inner| inner.init());

        Ok(())
    }
}

impl console::interface::Write for UartDm {
    fn write_char(&self, c: char) {
        self.inner.lock(|inner| inner.write_char(c));
    }

    fn write_fmt(&self, args: core::fmt::Arguments) -> fmt::Result {
        // Fully qualified syntax for the call to `core::fmt::Write::write_fmt()` to increase
        // readability.
        self.inner.lock(|inner| fmt::Write::write_fmt(inner, args))
    }

    fn flush(&self) {
        self.inner.lock(|inner| inner.flush());
    }
}

impl console::interface::Statistics for UartDm {
    fn chars_written(&self) -> usize {
        self.inner.lock(|inner| inner.chars_written)
    }
}

impl console::interface::All for UartDm {}
