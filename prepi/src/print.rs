// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2023 Andre Richter <andre.o.richter@gmail.com>

//! Printing.
//!
//! There is no architectural timer subsystem in this phase, so unlike later firmware stages the
//! log macros carry a severity tag instead of a timestamp.

use crate::console;
use core::fmt;

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    console::console().write_fmt(args).unwrap();
}

/// Prints without a newline.
///
/// Carbon copy from <https://doc.rust-lang.org/src/std/macros.rs.html>
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::print::_print(format_args!($($arg)*)));
}

/// Prints with a newline.
///
/// Carbon copy from <https://doc.rust-lang.org/src/std/macros.rs.html>
#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ({
        $crate::print::_print(::core::format_args_nl!($($arg)*));
    })
}

/// Prints an info, with a newline.
#[macro_export]
macro_rules! info {
    ($string:expr) => ({
        $crate::print::_print(::core::format_args_nl!(concat!("[I] ", $string)));
    });
    ($format_string:expr, $($arg:tt)*) => ({
        $crate::print::_print(::core::format_args_nl!(
            concat!("[I] ", $format_string),
            $($arg)*
        ));
    })
}

/// Prints a warning, with a newline.
#[macro_export]
macro_rules! warn {
    ($string:expr) => ({
        $crate::print::_print(::core::format_args_nl!(concat!("[W] ", $string)));
    });
    ($format_string:expr, $($arg:tt)*) => ({
        $crate::print::_print(::core::format_args_nl!(
            concat!("[W] ", $format_string),
            $($arg)*
        ));
    })
}

/// Debug print, with a newline.
#[macro_export]
macro_rules! debug {
    ($string:expr) => ({
        if cfg!(feature = "debug_prints") {
            $crate::print::_print(::core::format_args_nl!(concat!("<D> ", $string)));
        }
    });
    ($format_string:expr, $($arg:tt)*) => ({
        if cfg!(feature = "debug_prints") {
            $crate::print::_print(::core::format_args_nl!(
                concat!("<D> ", $format_string),
                $($arg)*
            ));
        }
    })
}
