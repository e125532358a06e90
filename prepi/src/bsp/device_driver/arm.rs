// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2020-2023 Andre Richter <andre.o.richter@gmail.com>

//! ARM driver top level.

pub mod gicv2;

pub use gicv2::*;
