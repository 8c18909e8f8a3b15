// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting strings into literal and marker segments.

use crate::grammar::Grammar;
use crate::types::Segment;

/// Scan `text` with the grammar chosen by [`Grammar::select`].
///
/// Text without any marker comes back as a single [`Segment::Literal`] equal
/// to the input, including the empty string.
pub fn scan(text: &str) -> Vec<Segment<'_>> {
    match Grammar::select(text) {
        Some(grammar) => scan_with(text, grammar),
        None => vec![Segment::Literal(text)],
    }
}

/// Scan `text` with one specific grammar.
///
/// Literal runs between, before, and after markers are emitted only when
/// non-empty. If the grammar finds nothing the result is a single literal
/// equal to the input.
pub fn scan_with(text: &str, grammar: Grammar) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for marker in grammar.find_iter(text) {
        if marker.start() > last {
            out.push(Segment::Literal(&text[last..marker.start()]));
        }
        last = marker.end();
        out.push(Segment::Marker(marker));
    }
    if out.is_empty() {
        return vec![Segment::Literal(text)];
    }
    if last < text.len() {
        out.push(Segment::Literal(&text[last..]));
    }
    out
}

/// Whether `text` contains any marker of either grammar.
pub fn has_markers(text: &str) -> bool {
    Grammar::select(text).is_some()
}
