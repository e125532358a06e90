// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! BSP driver support.

use crate::{console, driver::interface::DeviceDriver};

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Bring up the diagnostic output path: display pipe first, then the serial console.
///
/// Purely observational; a broken serial port degrades the boot to silence, it does not stop it.
/// Must run before anything that can fail, so that failures have a place to report to.
///
/// # Safety
///
/// - Must only be called once, early in the boot sequence.
pub unsafe fn init_diagnostics() -> Result<(), &'static str> {
    super::MDP5.init()?;
    super::UART_DM.init()?;

    console::register_console(&super::UART_DM);

    Ok(())
}

/// The display block's hardware revision, for the bring-up banner.
pub fn display_hw_revision() -> u32 {
    super::MDP5.hw_revision()
}

/// Bring the interrupt controller into its defined quiescent state.
///
/// # Safety
///
/// - Must only be called once, after the MMU is live.
pub unsafe fn init_interrupt_controller() -> Result<(), &'static str> {
    super::INTERRUPT_CONTROLLER.init()
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

/// Minimal code needed to bring up the console in QEMU. The display pipe is skipped; QEMU does
/// not model it.
#[cfg(feature = "test_build")]
pub fn qemu_bring_up_console() {
    unsafe {
        super::UART_DM.init().unwrap_or_else(|_| crate::cpu::qemu_exit_failure());
    }

    console::register_console(&super::UART_DM);
}
