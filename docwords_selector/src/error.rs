// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while loading page inputs.
//!
//! Interaction never fails; only decoding the dictionary or the config can.

use thiserror::Error;

/// Result alias for fallible loading operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Loading errors.
#[derive(Error, Debug)]
pub enum Error {
    /// The keyword dictionary payload could not be decoded.
    #[error("invalid keyword dictionary: {0}")]
    Dictionary(#[source] serde_json::Error),

    /// The selector configuration could not be decoded.
    #[error("invalid selector config: {0}")]
    Config(#[source] serde_json::Error),
}
