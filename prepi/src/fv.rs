// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! Firmware volume handling.
//!
//! The flash image that contains this code also carries, immediately after our own image, a
//! DEFLATE-compressed firmware volume with the modules of the next stage. This module locates
//! that payload, inflates it into pages carved from the handoff block's free region, and exposes
//! the result as a parsed volume for the loader to pick through.
//!
//! On-flash framing:
//!
//! +--------------------------+ firmware device base
//! | this image               |
//! +--------------------------+ __image_end (8-byte aligned)
//! | CompressedVolumeHeader   |
//! | DEFLATE stream           |
//! +--------------------------+
//!
//! Decompressed volume framing:
//!
//! +--------------------------+
//! | VolumeHeader             |
//! +--------------------------+
//! | FileHeader | data        |   files, 8-byte aligned
//! | FileHeader | data        |
//! | ...                      |
//! +--------------------------+
//!
//! The codec itself is `miniz_oxide`'s no-allocation inflate core; its (sizable) state lives in a
//! static that the deferred-constructor pass initializes once memory is up.

use crate::{
    handoff::HandoffBlock,
    memory::MemoryRegion,
    synchronization::{interface::Mutex, NullLock},
};
use core::{mem::size_of, slice};
use miniz_oxide::inflate::{
    core::{decompress, inflate_flags, DecompressorOxide},
    TINFLStatus,
};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// What a volume file contains.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u32)]
pub enum FileKind {
    /// The core-stage image (ELF).
    NextStageCore = 1,

    /// Opaque payload, passed through untouched.
    Raw = 2,
}

/// Header of the compressed payload that sits behind this image on flash.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct CompressedVolumeHeader {
    signature: u32,
    compressed_size: u32,
    uncompressed_size: u32,
    checksum: u32,
}

/// Header of a decompressed volume.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct VolumeHeader {
    signature: u32,
    total_size: u32,
    file_count: u32,
    _reserved: u32,
}

/// Header of one file inside a volume.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct FileHeader {
    kind: u32,
    data_size: u32,
}

/// A parsed, decompressed firmware volume.
pub struct FirmwareVolume {
    region: MemoryRegion,
    file_count: usize,
}

/// One file of a volume.
pub struct FvFile<'a> {
    /// What the file contains.
    pub kind: FileKind,

    /// The file's payload.
    pub data: &'a [u8],
}

/// Iterator over the files of a volume.
pub struct FileIter<'a> {
    cursor: usize,
    remaining: usize,
    end_exclusive: usize,
    _volume: &'a FirmwareVolume,
}

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

const COMPRESSED_SIGNATURE: u32 = u32::from_le_bytes(*b"qCFV");
const VOLUME_SIGNATURE: u32 = u32::from_le_bytes(*b"qFV\0");

/// Files are aligned to this within a volume.
const FILE_ALIGN: usize = 8;

const PAGE_SIZE: usize = 4 * 1024;

//--------------------------------------------------------------------------------------------------
// Global instances
//--------------------------------------------------------------------------------------------------

/// The inflate state. `DecompressorOxide` is ~11 KiB and has no const constructor, so it is built
/// by a deferred constructor instead of living on the boot stack.
static INFLATE_STATE: NullLock<Option<DecompressorOxide>> = NullLock::new(None);

//--------------------------------------------------------------------------------------------------
// Private Code
//--------------------------------------------------------------------------------------------------

/// Additive checksum over the payload, for catching truncated flashes before inflating garbage.
fn payload_checksum(data: &[u8]) -> u32 {
    data.iter().fold(0u32, |acc, &b| acc.wrapping_add(b as u32))
}

impl CompressedVolumeHeader {
    fn validate(&self, space_behind_image: usize) -> Result<(), &'static str> {
        if self.signature != COMPRESSED_SIGNATURE {
            return Err("No compressed volume behind this image");
        }

        if self.compressed_size == 0
            || (self.compressed_size as usize) > space_behind_image - size_of::<Self>()
        {
            return Err("Compressed volume exceeds the firmware device");
        }

        if self.uncompressed_size < size_of::<VolumeHeader>() as u32 {
            return Err("Uncompressed size smaller than a volume header");
        }

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Build the inflate state. Runs as a deferred constructor.
pub fn init_inflate_state() {
    INFLATE_STATE.lock(|state| *state = Some(DecompressorOxide::default()));
}

impl FirmwareVolume {
    /// Validate a decompressed volume and return a handle to it.
    pub fn parse(region: MemoryRegion) -> Result<FirmwareVolume, &'static str> {
        if region.size < size_of::<VolumeHeader>() {
            return Err("Region too small for a volume header");
        }

        let header = unsafe { &*(region.base as *const VolumeHeader) };

        if header.signature != VOLUME_SIGNATURE {
            return Err("Bad firmware volume signature");
        }

        if (header.total_size as usize) < size_of::<VolumeHeader>()
            || (header.total_size as usize) > region.size
        {
            return Err("Firmware volume size out of bounds");
        }

        Ok(FirmwareVolume {
            region: MemoryRegion::new(region.base, header.total_size as usize),
            file_count: header.file_count as usize,
        })
    }

    /// The memory the volume occupies.
    pub fn region(&self) -> &MemoryRegion {
        &self.region
    }

    /// Iterate over the files of the volume.
    pub fn files(&self) -> FileIter {
        FileIter {
            cursor: self.region.base + size_of::<VolumeHeader>(),
            remaining: self.file_count,
            end_exclusive: self.region.end_exclusive(),
            _volume: self,
        }
    }
}

impl<'a> Iterator for FileIter<'a> {
    type Item = Result<FvFile<'a>, &'static str>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        if self.cursor + size_of::<FileHeader>() > self.end_exclusive {
            return Some(Err("Volume file table is truncated"));
        }

        let header = unsafe { &*(self.cursor as *const FileHeader) };
        let data_start = self.cursor + size_of::<FileHeader>();

        if data_start + header.data_size as usize > self.end_exclusive {
            return Some(Err("Volume file data is truncated"));
        }

        let kind = match header.kind {
            1 => FileKind::NextStageCore,
            2 => FileKind::Raw,
            _ => return Some(Err("Unknown volume file kind")),
        };

        let data =
            unsafe { slice::from_raw_parts(data_start as *const u8, header.data_size as usize) };

        self.cursor = crate::common::align_up(data_start + header.data_size as usize, FILE_ALIGN);

        Some(Ok(FvFile { kind, data }))
    }
}

/// Locate the compressed volume behind this image and inflate it into the firmware pool.
///
/// The destination pages come from the handoff block's free region, which also makes the volume's
/// location visible to the next stage through the block's free pointers.
pub fn decompress_next_volume(
    block: &mut HandoffBlock,
) -> Result<FirmwareVolume, &'static str> {
    let fd = crate::bsp::memory::firmware_device();
    let payload_base = crate::bsp::memory::image_end();

    if payload_base + size_of::<CompressedVolumeHeader>() > fd.end_exclusive() {
        return Err("No room behind this image for a compressed volume");
    }

    let header = unsafe { &*(payload_base as *const CompressedVolumeHeader) };
    header.validate(fd.end_exclusive() - payload_base)?;

    let compressed = unsafe {
        slice::from_raw_parts(
            (payload_base + size_of::<CompressedVolumeHeader>()) as *const u8,
            header.compressed_size as usize,
        )
    };

    if payload_checksum(compressed) != header.checksum {
        return Err("Compressed volume checksum mismatch");
    }

    let dst_region = block.alloc_pages(
        (header.uncompressed_size as usize).div_ceil(PAGE_SIZE),
    )?;
    let dst = unsafe {
        slice::from_raw_parts_mut(dst_region.base as *mut u8, header.uncompressed_size as usize)
    };

    INFLATE_STATE.lock(|state| {
        let state = state.as_mut().ok_or("Inflate state not constructed")?;
        state.init();

        let (status, _in_consumed, out_written) = decompress(
            state,
            compressed,
            dst,
            0,
            inflate_flags::TINFL_FLAG_USING_NON_WRAPPING_OUTPUT_BUF,
        );

        if status != TINFLStatus::Done || out_written != header.uncompressed_size as usize {
            return Err("Inflating the firmware volume failed");
        }

        Ok(())
    })?;

    FirmwareVolume::parse(MemoryRegion::new(
        dst_region.base,
        header.uncompressed_size as usize,
    ))
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use test_macros::kernel_test;

    #[repr(align(8))]
    struct VolumeBuffer([u8; 256]);

    /// Hand-assemble a volume with one raw file and one core file.
    fn build_volume(buf: &mut VolumeBuffer) -> MemoryRegion {
        let base = buf.0.as_mut_ptr() as usize;

        let file_a = [0xAAu8; 5];
        let file_b = [0x7Fu8, b'E', b'L', b'F'];

        unsafe {
            let mut cursor = base + size_of::<VolumeHeader>();

            core::ptr::write(
                cursor as *mut FileHeader,
                FileHeader {
                    kind: 2,
                    data_size: file_a.len() as u32,
                },
            );
            core::ptr::copy_nonoverlapping(
                file_a.as_ptr(),
                (cursor + size_of::<FileHeader>()) as *mut u8,
                file_a.len(),
            );
            cursor = crate::common::align_up(
                cursor + size_of::<FileHeader>() + file_a.len(),
                FILE_ALIGN,
            );

            core::ptr::write(
                cursor as *mut FileHeader,
                FileHeader {
                    kind: 1,
                    data_size: file_b.len() as u32,
                },
            );
            core::ptr::copy_nonoverlapping(
                file_b.as_ptr(),
                (cursor + size_of::<FileHeader>()) as *mut u8,
                file_b.len(),
            );
            cursor = crate::common::align_up(
                cursor + size_of::<FileHeader>() + file_b.len(),
                FILE_ALIGN,
            );

            core::ptr::write(
                base as *mut VolumeHeader,
                VolumeHeader {
                    signature: VOLUME_SIGNATURE,
                    total_size: (cursor - base) as u32,
                    file_count: 2,
                    _reserved: 0,
                },
            );
        }

        MemoryRegion::new(base, buf.0.len())
    }

    /// A well-formed volume parses and yields its files in order.
    #[kernel_test]
    fn volume_files_walk_in_order() {
        let mut buf = VolumeBuffer([0; 256]);
        let region = build_volume(&mut buf);

        let volume = FirmwareVolume::parse(region).unwrap();
        let mut files = volume.files();

        let first = files.next().unwrap().unwrap();
        assert_eq!(first.kind, FileKind::Raw);
        assert_eq!(first.data, &[0xAA; 5]);

        let second = files.next().unwrap().unwrap();
        assert_eq!(second.kind, FileKind::NextStageCore);
        assert_eq!(&second.data[..4], &[0x7F, b'E', b'L', b'F']);

        assert!(files.next().is_none());
    }

    /// A bad signature or an out-of-bounds size is rejected.
    #[kernel_test]
    fn volume_parse_rejects_malformed_headers() {
        let mut buf = VolumeBuffer([0; 256]);
        let region = build_volume(&mut buf);

        // Signature off by one bit.
        unsafe {
            (*(region.base as *mut VolumeHeader)).signature ^= 1;
        }
        assert!(FirmwareVolume::parse(region).is_err());
        unsafe {
            (*(region.base as *mut VolumeHeader)).signature ^= 1;
        }

        // Claimed size beyond the backing region.
        unsafe {
            (*(region.base as *mut VolumeHeader)).total_size = (region.size + 1) as u32;
        }
        assert!(FirmwareVolume::parse(region).is_err());
    }

    /// The payload checksum catches single-byte corruption.
    #[kernel_test]
    fn payload_checksum_catches_corruption() {
        let good = [1u8, 2, 3, 4, 5];
        let mut bad = good;
        bad[2] ^= 0x10;

        assert_ne!(payload_checksum(&good), payload_checksum(&bad));
    }
}
