// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2019-2023 Andre Richter <andre.o.richter@gmail.com>

//! Console sanity tests - TX and statistics.

#![feature(format_args_nl)]
#![no_main]
#![no_std]

/// Console tests should time out on the I/O harness in case of panic.
mod panic_wait_forever;

use libprepi::{bsp, console, cpu, print};

#[no_mangle]
unsafe fn sec_init(_stack_base: usize, _stack_size: usize) -> ! {
    bsp::driver::qemu_bring_up_console();

    // Handshake with the I/O harness.
    print!("OK1234");

    // 6
    print!("{}", console::console().chars_written());

    // The QEMU process running this test will be closed by the I/O test harness.
    cpu::wait_forever();
}
