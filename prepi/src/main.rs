// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

// Rust embedded logo for `make doc`.
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/rust-embedded/wg/master/assets/logo/ewg-logo-blue-white-on-transparent.png"
)]

//! The `prepi` binary.
//!
//! The single linear walk from "freshly reset core" to "core stage running". Each station of the
//! sequence is recorded in the phase state machine; the only branches are into the two terminal
//! halt states.

#![feature(format_args_nl)]
#![no_main]
#![no_std]

use libprepi::{
    bsp, constructors, cpu, fv,
    handoff::{BootMode, HandoffBlock},
    info, loader, memory,
    memory::BootLayout,
    state,
    state::BootPhase,
};

/// Early init code.
///
/// # Safety
///
/// - Only a single core must be active and running this function.
/// - The init calls in this function must appear in the correct order:
///     - CPU features first; the compiler is free to emit FP/SIMD instructions anywhere.
///     - Diagnostics next, so every later failure has a place to report to.
///     - The data cache over the firmware image must be invalidated before the MMU (re)enables
///       caching, or stale lines from the trampoline era could shadow the payload.
///     - The interrupt controller's MMIO is only mapped with device attributes once the MMU is
///       live.
#[no_mangle]
unsafe fn sec_init(stack_base: usize, stack_size: usize) -> ! {
    let phase = state::phase_manager();

    // Architecture-specific initialization: FP/SIMD and program-flow prediction.
    cpu::enable_features();
    phase.advance_to(BootPhase::FeaturesEnabled);

    // Bring up the diagnostic output path. Purely observational; a failure degrades the boot to
    // silence but never stops it.
    if bsp::driver::init_diagnostics().is_ok() {
        info!(
            "prepi on {} (display rev {:#010x})",
            bsp::board_name(),
            bsp::driver::display_hw_revision()
        );
        info!("{}", libprepi::version());
    }
    phase.advance_to(BootPhase::DiagnosticsUp);

    // Plan the memory layout. A rejected configuration is a build defect; nothing to retry.
    let layout = match memory::plan(bsp::memory::boot_config(), stack_size) {
        Ok(layout) => layout,
        Err(e) => state::halt_assert(e),
    };

    // The trampoline's stack and the planned stack are configured independently (linker script
    // vs. configuration table) and must agree.
    if layout.stack.base != stack_base {
        state::halt_assert("Trampoline stack disagrees with the memory plan");
    }

    info!(
        "Pool base = {:#x}, size = {:#x}, stack base = {:#x}, stack size = {:#x}",
        layout.pool.base, layout.pool.size, layout.stack.base, layout.stack.size
    );
    phase.advance_to(BootPhase::LayoutPlanned);

    // Construct the handoff block at the start of the pool. Everything downstream appends to it;
    // nothing may run before it exists.
    let block = match HandoffBlock::construct(&layout.pool, &layout.stack) {
        Ok(block) => block,
        Err(e) => state::halt_assert(e),
    };
    phase.advance_to(BootPhase::HandoffBuilt);

    // Drop every cache line covering the firmware image. The trampoline era may have left stale
    // lines behind.
    let fd = bsp::memory::firmware_device();
    memory::cache::invalidate_data_cache_range(fd.base, fd.size);
    phase.advance_to(BootPhase::CacheClean);

    // Switch on translation and caching. From here on, memory attributes apply.
    if let Err(e) = memory::mmu::enable_mmu_and_caching(&layout.pool) {
        state::halt_fatal(e);
    }
    info!("MMU configured and live");
    phase.advance_to(BootPhase::MmuActive);

    // Quiesce the interrupt controller. Later stages assume a working, silent controller.
    if let Err(e) = bsp::driver::init_interrupt_controller() {
        state::halt_fatal(e);
    }
    phase.advance_to(BootPhase::InterruptsReady);

    // Transition from unsafe to safe.
    sec_main(layout, block)
}

/// The remainder of the sequence, running after the hardware bring-up.
fn sec_main(layout: BootLayout, mut block: HandoffBlock) -> ! {
    let phase = state::phase_manager();

    // Describe the stack and the CPU to the next stage.
    if let Err(e) = block
        .append_stack(&layout.stack)
        .and_then(|_| block.append_cpu(cpu::phys_address_bits(), bsp::memory::CPU_IO_SPACE_BITS))
    {
        state::halt_assert(e);
    }
    phase.advance_to(BootPhase::HandoffAugmented);

    // Record the boot mode. There is exactly one in this phase.
    if let Err(e) = block.set_boot_mode(BootMode::FullConfiguration) {
        state::halt_assert(e);
    }
    phase.advance_to(BootPhase::BootModeSet);

    // Let the board add its facts (system memory, firmware device).
    if let Err(e) = bsp::platform::install_platform_facts(&mut block) {
        state::halt_assert(e);
    }
    phase.advance_to(BootPhase::PlatformFactsInstalled);

    // Statically linked modules that waited for memory services.
    constructors::run_all();
    phase.advance_to(BootPhase::ConstructorsRun);

    // Expand the firmware volume that travels behind this image.
    let volume = match fv::decompress_next_volume(&mut block) {
        Ok(volume) => volume,
        Err(e) => state::halt_assert(e),
    };
    info!(
        "Firmware volume decompressed to {:#x}, size = {:#x}",
        volume.region().base,
        volume.region().size
    );
    phase.advance_to(BootPhase::VolumeDecompressed);

    // Place the core stage and leave for good.
    let image = match loader::locate_and_load(&volume, &layout) {
        Ok(image) => image,
        Err(e) => state::halt_assert(e),
    };
    phase.advance_to(BootPhase::NextStageLoaded);

    info!("Handing off to the core stage at {:#x}", image.entry());
    libprepi::console::console().flush();

    unsafe { loader::transfer(&image, block.base()) }
}
