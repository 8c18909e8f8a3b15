// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marker grammars and the match iterator.
//!
//! ## Keyword grammar
//!
//! `___GROUP.FIELD___` or `___FIELD___`, where `GROUP` and `FIELD` each match
//! `[A-Z_][A-Z0-9_]*`. Matching is case-sensitive and bounded by ASCII word
//! boundaries, with one relaxation: two markers may touch. A marker is
//! accepted when
//!
//! - it starts at the beginning of the text, after a non-word character, or
//!   exactly where the previous accepted marker ended, and
//! - it ends at the end of the text, before a non-word character, or right
//!   where another accepted marker starts.
//!
//! The field is as long as possible while still satisfying the trailing rule,
//! so `___FOO___BAR___` is a single marker with field `FOO___BAR`, while
//! `___A.B______C.D___` is two markers. A touching run is accepted or
//! rejected as a whole: in `___A______B___x` the second marker fails its
//! right boundary, so the first one has nothing to end against and neither
//! is a marker.
//!
//! ## Org auth token grammar
//!
//! The literal `___ORG_AUTH_TOKEN___`, with no boundary rules.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::Marker;

/// Literal marker recognized by [`Grammar::OrgAuthToken`].
pub const ORG_AUTH_TOKEN_MARKER: &str = "___ORG_AUTH_TOKEN___";

const ORG_AUTH_TOKEN_FIELD: &str = "ORG_AUTH_TOKEN";

const DELIMITER: &str = "___";

// Whole-candidate shape; boundaries are checked by `Markers`.
// Capture 1: group, 2: field.
const KEYWORD_PATTERN: &str = r"\A___(?:([A-Z_][A-Z0-9_]*)\.)?([A-Z_][A-Z0-9_]*)___\z";

// Shortest possible keyword marker, `___X___`.
const MIN_KEYWORD_LEN: usize = 7;

/// The marker grammars, in the order they are tried.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Grammar {
    /// The fixed `___ORG_AUTH_TOKEN___` marker.
    OrgAuthToken,
    /// The generic `___[GROUP.]FIELD___` marker.
    Keyword,
}

impl Grammar {
    /// Grammars in precedence order: the fixed grammar first.
    pub const PRECEDENCE: [Self; 2] = [Self::OrgAuthToken, Self::Keyword];

    /// Pick the grammar to apply to `text`.
    ///
    /// Returns the first grammar in [`Grammar::PRECEDENCE`] that matches
    /// anywhere in `text`, or `None` if neither does. A string is scanned with
    /// exactly one grammar, so keyword markers sharing a string with an org
    /// token marker stay literal.
    pub fn select(text: &str) -> Option<Self> {
        Self::PRECEDENCE
            .into_iter()
            .find(|grammar| grammar.is_match(text))
    }

    /// Whether `text` contains at least one marker of this grammar.
    pub fn is_match(self, text: &str) -> bool {
        self.find_iter(text).next().is_some()
    }

    /// Iterate over the non-overlapping markers of this grammar, left to right.
    pub fn find_iter(self, text: &str) -> Markers<'_> {
        Markers {
            grammar: self,
            text,
            pos: 0,
            last_end: None,
            ends: HashMap::new(),
        }
    }

    fn regex(self) -> &'static Regex {
        static KEYWORD: OnceLock<Regex> = OnceLock::new();
        static ORG_AUTH_TOKEN: OnceLock<Regex> = OnceLock::new();
        match self {
            Self::Keyword => KEYWORD.get_or_init(|| compile(KEYWORD_PATTERN)),
            Self::OrgAuthToken => {
                ORG_AUTH_TOKEN.get_or_init(|| compile(&regex::escape(ORG_AUTH_TOKEN_MARKER)))
            }
        }
    }
}

#[allow(
    clippy::expect_used,
    reason = "Patterns are compile-time constants covered by tests."
)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("marker pattern is valid")
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_marker_byte(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_' || b == b'.'
}

/// Iterator over the markers of one [`Grammar`] in a string.
///
/// Created by [`Grammar::find_iter`].
#[derive(Clone, Debug)]
pub struct Markers<'a> {
    grammar: Grammar,
    text: &'a str,
    pos: usize,
    last_end: Option<usize>,
    // Keyword marker end for each start already examined, `None` if rejected.
    ends: HashMap<usize, Option<usize>>,
}

impl<'a> Markers<'a> {
    fn left_boundary_ok(&self, start: usize) -> bool {
        start == 0
            || self.last_end == Some(start)
            || !is_word_byte(self.text.as_bytes()[start - 1])
    }

    fn right_boundary_ok(&mut self, end: usize) -> bool {
        match self.text.as_bytes().get(end) {
            None => true,
            Some(&b) if !is_word_byte(b) => true,
            Some(_) => self.keyword_end(end).is_some(),
        }
    }

    /// End of the keyword marker starting at `start`, ignoring the left
    /// boundary. Longer fields are tried first.
    fn keyword_end(&mut self, start: usize) -> Option<usize> {
        if let Some(&end) = self.ends.get(&start) {
            return end;
        }
        let text = self.text;
        let end = if text[start..].starts_with(DELIMITER) {
            let bytes = text.as_bytes();
            let run = bytes[start..].iter().take_while(|&&b| is_marker_byte(b)).count();
            let regex = Grammar::Keyword.regex();
            (start + MIN_KEYWORD_LEN..=start + run).rev().find(|&end| {
                text[..end].ends_with(DELIMITER)
                    && regex.is_match(&text[start..end])
                    && self.right_boundary_ok(end)
            })
        } else {
            None
        };
        self.ends.insert(start, end);
        end
    }

    fn keyword_marker(&self, start: usize, end: usize) -> Option<Marker<'a>> {
        let text = self.text;
        let source = &text[start..end];
        let caps = Grammar::Keyword.regex().captures(source)?;
        Some(Marker {
            grammar: Grammar::Keyword,
            group: caps.get(1).map(|g| g.as_str()),
            field: caps.get(2)?.as_str(),
            span: start..end,
            source,
        })
    }
}

impl<'a> Iterator for Markers<'a> {
    type Item = Marker<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos <= self.text.len() {
            let marker = match self.grammar {
                Grammar::OrgAuthToken => {
                    let m = self.grammar.regex().find_at(self.text, self.pos)?;
                    Marker {
                        grammar: Grammar::OrgAuthToken,
                        group: None,
                        field: ORG_AUTH_TOKEN_FIELD,
                        span: m.range(),
                        source: m.as_str(),
                    }
                }
                Grammar::Keyword => {
                    let start = self.pos + self.text.get(self.pos..)?.find(DELIMITER)?;
                    let found = if self.left_boundary_ok(start) {
                        self.keyword_end(start)
                            .and_then(|end| self.keyword_marker(start, end))
                    } else {
                        None
                    };
                    match found {
                        Some(marker) => marker,
                        None => {
                            // Markers always begin with `_`, a single-byte char.
                            self.pos = start + 1;
                            continue;
                        }
                    }
                }
            };
            self.pos = marker.end();
            self.last_end = Some(marker.end());
            return Some(marker);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(grammar: Grammar, text: &str) -> Vec<(Option<&str>, &str, usize)> {
        grammar
            .find_iter(text)
            .map(|m| (m.group, m.field, m.start()))
            .collect()
    }

    #[test]
    fn keyword_with_and_without_group() {
        assert_eq!(
            fields(Grammar::Keyword, "a ___PROJECT.DSN___ b ___ORG_SLUG___"),
            vec![(Some("PROJECT"), "DSN", 2), (None, "ORG_SLUG", 22)]
        );
    }

    #[test]
    fn lowercase_and_unterminated_are_ignored() {
        assert!(fields(Grammar::Keyword, "___project.dsn___").is_empty());
        assert!(fields(Grammar::Keyword, "___DSN__ and ___DSN").is_empty());
        assert!(fields(Grammar::Keyword, "___1ABC___").is_empty());
    }

    #[test]
    fn word_boundaries_are_required() {
        assert!(fields(Grammar::Keyword, "x___DSN___").is_empty());
        assert!(fields(Grammar::Keyword, "___DSN___x").is_empty());
        assert_eq!(
            fields(Grammar::Keyword, "(___DSN___)"),
            vec![(None, "DSN", 1)]
        );
    }

    #[test]
    fn adjacent_markers_split() {
        assert_eq!(
            fields(Grammar::Keyword, "___PROJECT.DSN______PROJECT.ID___"),
            vec![(Some("PROJECT"), "DSN", 0), (Some("PROJECT"), "ID", 17)]
        );
    }

    #[test]
    fn touching_run_fails_as_a_whole() {
        assert!(fields(Grammar::Keyword, "___A______B___x").is_empty());
        assert!(fields(Grammar::Keyword, "___A.B______C___D").is_empty());
        assert!(fields(Grammar::Keyword, "___A.B______C.D___x").is_empty());
        assert_eq!(
            fields(Grammar::Keyword, "___A.B______C.D___ ok"),
            vec![(Some("A"), "B", 0), (Some("C"), "D", 9)]
        );
    }

    #[test]
    fn field_is_greedy_across_inner_underscores() {
        assert_eq!(
            fields(Grammar::Keyword, "___FOO___BAR___ done"),
            vec![(None, "FOO___BAR", 0)]
        );
    }

    #[test]
    fn org_token_has_no_boundaries() {
        assert_eq!(
            fields(Grammar::OrgAuthToken, "x___ORG_AUTH_TOKEN___y"),
            vec![(None, "ORG_AUTH_TOKEN", 1)]
        );
    }

    #[test]
    fn select_prefers_org_token() {
        assert_eq!(
            Grammar::select("___ORG_AUTH_TOKEN___ ___DSN___"),
            Some(Grammar::OrgAuthToken)
        );
        assert_eq!(Grammar::select("___DSN___"), Some(Grammar::Keyword));
        assert_eq!(Grammar::select("no markers"), None);
    }

    #[test]
    fn non_ascii_neighbours() {
        assert_eq!(fields(Grammar::Keyword, "é ___DSN___ ü"), vec![(None, "DSN", 3)]);
    }
}
