// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! Cache maintenance.

#[cfg(target_arch = "aarch64")]
#[path = "../_arch/aarch64/memory/cache.rs"]
mod arch_cache;

//--------------------------------------------------------------------------------------------------
// Architectural Public Reexports
//--------------------------------------------------------------------------------------------------
pub use arch_cache::invalidate_data_cache_range;
