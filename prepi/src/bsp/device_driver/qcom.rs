// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! Qualcomm driver top level.

mod mdp5;
mod uartdm;

pub use mdp5::*;
pub use uartdm::*;
