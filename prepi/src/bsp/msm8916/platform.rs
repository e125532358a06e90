// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! BSP platform facts.

use super::memory;
use crate::{
    handoff::HandoffBlock,
    memory::MemoryRegion,
};

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Append the board's contribution to the handoff block.
///
/// At minimum, the next stage needs to know where system memory is and where the firmware device
/// with the (still compressed) volume lives. Anything the board wants to tell later stages goes
/// through here, and through here only; after this call, the block's platform facts are final.
pub fn install_platform_facts(block: &mut HandoffBlock) -> Result<(), &'static str> {
    block.append_memory_region(&MemoryRegion::new(
        memory::map::SYS_MEM_START,
        memory::map::SYS_MEM_SIZE,
    ))?;

    block.append_firmware_volume(&memory::firmware_device())?;

    Ok(())
}
