// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scanner output: literal segments and structured marker matches.

use core::ops::Range;

use crate::grammar::Grammar;

/// Group used when a keyword marker omits the `GROUP.` prefix.
pub const DEFAULT_GROUP: &str = "PROJECT";

/// A single marker match.
///
/// Produced by [`Grammar::find_iter`] and carried by [`Segment::Marker`].
/// All string slices borrow from the scanned text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Marker<'a> {
    /// Grammar that produced the match.
    pub grammar: Grammar,
    /// Group written in the marker (`___GROUP.FIELD___`), if any.
    pub group: Option<&'a str>,
    /// Field name. For [`Grammar::OrgAuthToken`] this is `ORG_AUTH_TOKEN`.
    pub field: &'a str,
    /// Byte span of the whole marker, including both `___` delimiters.
    pub span: Range<usize>,
    /// The matched source text.
    pub source: &'a str,
}

impl<'a> Marker<'a> {
    /// Byte offset of the leading `___` within the scanned text.
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Byte offset one past the trailing `___`.
    pub fn end(&self) -> usize {
        self.span.end
    }

    /// The written group, or `default` when the marker omitted it.
    pub fn group_or<'b>(&self, default: &'b str) -> &'b str
    where
        'a: 'b,
    {
        match self.group {
            Some(group) => group,
            None => default,
        }
    }

    /// The written group, or [`DEFAULT_GROUP`].
    pub fn group(&self) -> &'a str {
        self.group.unwrap_or(DEFAULT_GROUP)
    }
}

/// One piece of a scanned string.
///
/// A scan alternates literal text and markers in source order. Literal
/// segments are never empty unless the whole input was empty and unmatched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text that passes through unchanged.
    Literal(&'a str),
    /// A recognized marker.
    Marker(Marker<'a>),
}

impl<'a> Segment<'a> {
    /// Returns the marker if this is a [`Segment::Marker`].
    pub fn as_marker(&self) -> Option<&Marker<'a>> {
        match self {
            Self::Marker(m) => Some(m),
            Self::Literal(_) => None,
        }
    }

    /// Returns the literal text if this is a [`Segment::Literal`].
    pub fn as_literal(&self) -> Option<&'a str> {
        match self {
            Self::Literal(s) => Some(s),
            Self::Marker(_) => None,
        }
    }

    /// Source text covered by this segment.
    pub fn source(&self) -> &'a str {
        match self {
            Self::Literal(s) => s,
            Self::Marker(m) => m.source,
        }
    }
}
