// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! Device driver.

#[cfg(feature = "bsp_msm8916")]
mod arm;
#[cfg(feature = "bsp_msm8916")]
mod common;
#[cfg(feature = "bsp_msm8916")]
mod qcom;

#[cfg(feature = "bsp_msm8916")]
pub use arm::*;
#[cfg(feature = "bsp_msm8916")]
pub use qcom::*;
