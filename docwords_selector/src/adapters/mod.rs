// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Docwords crates.
//!
//! Enabled via feature flags to keep the core independent of the rewriter.

#[cfg(feature = "tree_adapter")]
pub mod tree;
