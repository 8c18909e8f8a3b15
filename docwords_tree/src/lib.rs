// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=docwords_tree --heading-base-level=0

//! Docwords Tree: rewrite rendered documentation content around keyword markers.
//!
//! Rendered documentation arrives as a tree of [`ContentNode`]s: text leaves
//! and elements with attributes and children. [`Rewriter`] walks that tree and
//! returns a parallel tree of [`RenderedNode`]s in which every marker found by
//! `docwords_scanner` has been replaced by a [`WidgetSlot`].
//!
//! - Elements keep their tag and attributes; only text leaves change.
//! - Each slot carries a [`WidgetKey`] built from its position in the input and
//!   the marker offset, prefixed by grammar. Keys are stable across rewrites of
//!   the same input, which lets a host keep widget state (an open dropdown, an
//!   in-flight token request) alive across re-renders.
//! - The rewriter is pure: it never mutates the input.
//!
//! This crate does not resolve markers against a dictionary. The selector
//! layer (`docwords_selector`) mounts a widget per slot and renders it.
//!
//! # Example
//!
//! ```rust
//! use docwords_tree::{ContentNode, Element, RenderedNode, WidgetKind, rewrite};
//!
//! let input = vec![ContentNode::from(
//!     Element::new("code").with_child("key: ___PROJECT.DSN___"),
//! )];
//! let out = rewrite(&input);
//!
//! let RenderedNode::Element(code) = &out[0] else { unreachable!() };
//! assert_eq!(code.children[0], RenderedNode::Text("key: ".into()));
//!
//! let slot = code.children[1].as_widget().unwrap();
//! assert_eq!(slot.key.to_string(), "project-keyword-0.0:5");
//! assert!(matches!(
//!     &slot.kind,
//!     WidgetKind::Keyword { group, field, .. } if group == "PROJECT" && field == "DSN"
//! ));
//! ```

pub mod rewrite;
pub mod types;

pub use rewrite::{Rewriter, for_each_widget, rewrite, visible_text, widgets};
pub use types::{
    ContentNode, Element, KeyPrefix, RenderedElement, RenderedNode, WidgetKey, WidgetKind,
    WidgetSlot,
};
