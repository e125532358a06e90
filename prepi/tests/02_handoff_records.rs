// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2019-2023 Andre Richter <andre.o.richter@gmail.com>

//! Handoff block end-to-end test - the record sequence the next stage will see.

#![feature(format_args_nl)]
#![no_main]
#![no_std]

use libprepi::{
    bsp, cpu,
    handoff::{BootMode, Entry, HandoffBlock},
    memory::MemoryRegion,
};

/// Stands in for the firmware pool, which QEMU does not back on this machine type.
#[repr(align(4096))]
struct PoolBuffer([u8; 64 * 1024]);

static mut POOL: PoolBuffer = PoolBuffer([0; 64 * 1024]);

#[no_mangle]
unsafe fn sec_init(_stack_base: usize, _stack_size: usize) -> ! {
    bsp::driver::qemu_bring_up_console();

    let pool = MemoryRegion::new(POOL.0.as_ptr() as usize, POOL.0.len());
    let stack = MemoryRegion::new(pool.end_exclusive() - 0x1000, 0x1000);

    // The same append sequence the boot performs.
    let mut block = HandoffBlock::construct(&pool, &stack).unwrap();
    block.append_stack(&stack).unwrap();
    block.append_cpu(cpu::phys_address_bits(), 0).unwrap();
    block.set_boot_mode(BootMode::FullConfiguration).unwrap();
    bsp::platform::install_platform_facts(&mut block).unwrap();

    // The consumer's view: stack, cpu, then the board's system memory and firmware volume
    // records, in exactly that order.
    let mut entries = block.entries();

    assert!(matches!(entries.next(), Some(Entry::Stack(e)) if e.base == stack.base as u64));
    assert!(matches!(entries.next(), Some(Entry::Cpu(_))));
    assert!(matches!(entries.next(), Some(Entry::MemoryRegion(_))));

    let fd = bsp::memory::firmware_device();
    assert!(
        matches!(entries.next(), Some(Entry::FirmwareVolume(e)) if e.base == fd.base as u64)
    );
    assert!(entries.next().is_none());

    assert_eq!(block.boot_mode(), Some(BootMode::FullConfiguration));

    cpu::qemu_exit_success()
}
