// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the ldig command-line tool and library.
//!
//! Four variants, matching the four ways this program can fail: a bad
//! invocation, a failed filesystem operation, a malformed model file, or an
//! ESA construction that overflowed its index type. Every variant maps to
//! exit code 1; nothing here is retried.

use std::fmt;
use std::io;

/// Errors surfaced by corpus loading, model I/O, and the CLI driver.
#[derive(Debug)]
pub enum LdigError {
    /// Bad CLI invocation: missing flag, unknown mode, unparsable number.
    Usage(String),
    /// Filesystem failure reading or writing a corpus or model file.
    Io(io::Error),
    /// Model file is the wrong shape: version mismatch, truncated, bad CRC,
    /// or a corpus record that doesn't parse.
    Format(String),
    /// Enhanced suffix array construction returned its fatal sentinel
    /// (the input exceeded `u32::MAX` suffixes).
    Esa,
}

impl fmt::Display for LdigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LdigError::Usage(msg) => write!(f, "usage error: {msg}"),
            LdigError::Io(err) => write!(f, "I/O error: {err}"),
            LdigError::Format(msg) => write!(f, "format error: {msg}"),
            LdigError::Esa => write!(f, "enhanced suffix array construction failed: input too large"),
        }
    }
}

impl std::error::Error for LdigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LdigError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for LdigError {
    fn from(err: io::Error) -> Self {
        LdigError::Io(err)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LdigError>;
