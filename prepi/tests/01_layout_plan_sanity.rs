// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2019-2023 Andre Richter <andre.o.richter@gmail.com>

//! Memory plan sanity tests - the board configuration must survive its own validation.

#![feature(format_args_nl)]
#![no_main]
#![no_std]

use libprepi::{bsp, cpu, memory};

#[no_mangle]
unsafe fn sec_init(_stack_base: usize, _stack_size: usize) -> ! {
    bsp::driver::qemu_bring_up_console();

    let config = bsp::memory::boot_config();
    let stack_size = 0x4_0000;

    let layout = memory::plan(config, stack_size).unwrap();

    // The documented derivation.
    assert_eq!(layout.pool.base, config.sys_mem_base + config.prealloc_size);
    assert_eq!(
        layout.stack.base,
        layout.pool.base + layout.pool.size - stack_size
    );
    assert!(layout.pool.contains_region(&layout.stack));
    assert!(layout.system.contains_region(&layout.pool));

    // The firmware device must lie in the pre-allocated region; the pool gets overwritten.
    assert!(layout
        .prealloc
        .contains_region(&bsp::memory::firmware_device()));

    cpu::qemu_exit_success()
}
