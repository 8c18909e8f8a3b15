// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=docwords_scanner --heading-base-level=0

//! Docwords Scanner: find keyword markers in documentation text.
//!
//! Documentation authors embed placeholders such as `___PROJECT.DSN___` or
//! `___ORG_AUTH_TOKEN___` in code samples. This crate recognizes them and
//! splits a string into an ordered sequence of literal text and structured
//! matches, which higher layers turn into interactive widgets.
//!
//! - Two grammars: the generic `___[GROUP.]FIELD___` keyword grammar and the
//!   fixed `___ORG_AUTH_TOKEN___` marker. See [`Grammar`].
//! - A string is scanned with the fixed grammar if it contains the fixed
//!   marker anywhere, otherwise with the keyword grammar.
//! - Malformed markers are never an error. They stay literal text.
//! - Empty literal runs between adjacent markers are dropped.
//!
//! It does not know about dictionaries, selections or rendering. Pair it with
//! `docwords_tree` to rewrite a content tree.
//!
//! # Example
//!
//! ```rust
//! use docwords_scanner::{scan, Segment};
//!
//! let segments = scan("dsn: ___PROJECT.DSN___");
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0], Segment::Literal("dsn: "));
//!
//! let marker = segments[1].as_marker().unwrap();
//! assert_eq!(marker.group(), "PROJECT");
//! assert_eq!(marker.field, "DSN");
//! assert_eq!(marker.start(), 5);
//! ```
//!
//! Omitted groups fall back to [`DEFAULT_GROUP`]:
//!
//! ```rust
//! use docwords_scanner::{scan, DEFAULT_GROUP};
//!
//! let segments = scan("___ORG_SLUG___");
//! assert_eq!(segments[0].as_marker().unwrap().group(), DEFAULT_GROUP);
//! ```

pub mod grammar;
pub mod scan;
pub mod types;

pub use grammar::{Grammar, Markers, ORG_AUTH_TOKEN_MARKER};
pub use scan::{has_markers, scan, scan_with};
pub use types::{DEFAULT_GROUP, Marker, Segment};
