// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! Next-stage loader.
//!
//! Picks the core-stage image out of the decompressed firmware volume, puts its segments where
//! they belong and jumps. The image format is ELF; everything position-dependent was resolved at
//! the image's link time, so loading is a plain segment copy. Relocation machinery is the image
//! toolchain's business, not ours.

use crate::{fv::{FileKind, FirmwareVolume}, memory::BootLayout};
use xmas_elf::{header, program, ElfFile};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// A core-stage image whose segments are in place.
pub struct LoadedImage {
    entry: usize,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl LoadedImage {
    /// The image's entry point.
    pub fn entry(&self) -> usize {
        self.entry
    }
}

/// Locate the core-stage file in the volume and load its segments.
///
/// Every segment must land in system memory, outside of the regions this phase still needs
/// (its own image and the boot stack); the firmware pool's free region is the designated target.
pub fn locate_and_load(
    volume: &FirmwareVolume,
    layout: &BootLayout,
) -> Result<LoadedImage, &'static str> {
    let file = volume
        .files()
        .find_map(|f| match f {
            Ok(f) if f.kind == FileKind::NextStageCore => Some(Ok(f)),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
        .ok_or("No core-stage file in the firmware volume")??;

    let elf = ElfFile::new(file.data).map_err(|_| "Core-stage file is not a valid ELF image")?;

    if elf.header.pt2.machine().as_machine() != header::Machine::AArch64 {
        return Err("Core-stage image is for a foreign architecture");
    }

    for ph in elf.program_iter() {
        if ph.get_type() != Ok(program::Type::Load) {
            continue;
        }

        let target = crate::memory::MemoryRegion::new(
            ph.virtual_addr() as usize,
            ph.mem_size() as usize,
        );

        if !layout.system.contains_region(&target) {
            return Err("Core-stage segment outside of system memory");
        }

        let src_start = ph.offset() as usize;
        let file_size = ph.file_size() as usize;

        if src_start + file_size > file.data.len() || file_size > target.size {
            return Err("Core-stage segment exceeds its file");
        }

        unsafe {
            core::ptr::copy_nonoverlapping(
                file.data.as_ptr().add(src_start),
                target.base as *mut u8,
                file_size,
            );

            // The segment's zero-fill tail.
            core::ptr::write_bytes(
                (target.base + file_size) as *mut u8,
                0,
                target.size - file_size,
            );
        }
    }

    Ok(LoadedImage {
        entry: elf.header.pt2.entry_point() as usize,
    })
}

/// Transfer control to a loaded image.
///
/// The handoff block base is the single argument of the next stage's entry contract. This call
/// does not return; this phase is over.
///
/// # Safety
///
/// - `image` must have been produced by [`locate_and_load`] in this boot.
pub unsafe fn transfer(image: &LoadedImage, handoff_base: usize) -> ! {
    let next_stage: extern "C" fn(usize) -> ! = core::mem::transmute(image.entry());

    next_stage(handoff_base)
}
