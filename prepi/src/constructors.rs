// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! Deferred constructors.
//!
//! A few statically linked modules keep state that cannot be built before memory services exist
//! (for example, the decompressor's inflate state, which is far too big for pre-stack-switch
//! code). Such modules register a constructor here and get called exactly once, in the fixed
//! order of the table below, after the handoff block is in place.
//!
//! The runner observes no result. A constructor that cannot do its job must panic; there is
//! nothing the caller could do about it.

use crate::debug;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// A deferred constructor.
pub struct Constructor {
    /// Name for diagnostic output.
    pub name: &'static str,

    /// The init routine.
    pub init: fn(),
}

//--------------------------------------------------------------------------------------------------
// Global instances
//--------------------------------------------------------------------------------------------------

/// The constructor table. Order is part of the contract.
static CONSTRUCTORS: [Constructor; 1] = [Constructor {
    name: "fv inflate state",
    init: crate::fv::init_inflate_state,
}];

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Run all deferred constructors, in table order.
pub fn run_all() {
    for c in CONSTRUCTORS.iter() {
        debug!("Running constructor: {}", c.name);

        (c.init)();
    }
}
