// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for content trees: input nodes, rendered nodes, and widget keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A node of rendered documentation content, before keyword rewriting.
///
/// Leaves are text. Elements carry a tag, attributes, and ordered children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentNode {
    /// A text leaf.
    Text(String),
    /// A structural node.
    Element(Element),
}

impl ContentNode {
    /// Build a text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Self::Text(t) => out.push_str(t),
            Self::Element(el) => {
                for child in &el.children {
                    child.push_text(out);
                }
            }
        }
    }
}

impl From<Element> for ContentNode {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl From<&str> for ContentNode {
    fn from(text: &str) -> Self {
        Self::Text(text.into())
    }
}

impl From<String> for ContentNode {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A structural content node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name, e.g. `code` or `pre`.
    pub tag: String,
    /// Attributes, preserved verbatim by the rewriter.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// Ordered children.
    #[serde(default)]
    pub children: Vec<ContentNode>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder: set an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Builder: append a child.
    pub fn with_child(mut self, child: impl Into<ContentNode>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// Which grammar a widget slot came from. Rendered as the key prefix.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyPrefix {
    /// A keyword selector (`___GROUP.FIELD___`).
    ProjectKeyword,
    /// An org auth token creator (`___ORG_AUTH_TOKEN___`).
    OrgToken,
}

impl KeyPrefix {
    /// The textual prefix.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectKeyword => "project-keyword",
            Self::OrgToken => "org-token",
        }
    }
}

/// Stable identity of a widget slot within a rewritten tree.
///
/// `path` lists the sibling positions from the root list down to the text
/// leaf the marker was found in, using positions in the *input* tree, and
/// `offset` is the marker's byte offset inside that leaf. Rewriting the same
/// input always yields the same keys, and keys never collide across grammars
/// thanks to the prefix.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WidgetKey {
    /// Grammar prefix.
    pub prefix: KeyPrefix,
    /// Input-tree sibling positions, root first, ending at the text leaf.
    pub path: Vec<usize>,
    /// Byte offset of the marker within its text leaf.
    pub offset: usize,
}

impl fmt::Display for WidgetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix.as_str())?;
        f.write_str("-")?;
        for (i, p) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, ":{}", self.offset)
    }
}

/// What kind of widget a slot stands for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    /// A keyword selector bound to `group` and showing `field`.
    Keyword {
        /// Dictionary group (defaulted when the marker omitted it).
        group: String,
        /// Choice field to display.
        field: String,
        /// Rendering index; only used to disambiguate keys, never selection.
        index: usize,
    },
    /// The org auth token creator.
    OrgAuthToken,
}

/// A widget spliced into the rendered tree in place of a marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSlot {
    /// Stable key.
    pub key: WidgetKey,
    /// Widget kind and parameters.
    pub kind: WidgetKind,
    /// Original marker text, for hosts that want to show it verbatim.
    pub source: String,
}

/// A node of rewritten content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderedNode {
    /// Literal text.
    Text(String),
    /// A structural node with rewritten children.
    Element(RenderedElement),
    /// A widget standing in for a marker.
    Widget(WidgetSlot),
}

/// A structural node after rewriting. Tag and attributes are those of the input.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedElement {
    /// Tag name.
    pub tag: String,
    /// Attributes.
    pub attrs: BTreeMap<String, String>,
    /// Rewritten children.
    pub children: Vec<RenderedNode>,
}

impl RenderedNode {
    /// Returns the widget slot if this node is one.
    pub fn as_widget(&self) -> Option<&WidgetSlot> {
        match self {
            Self::Widget(w) => Some(w),
            _ => None,
        }
    }

    /// Visible text of this node, asking `resolve` for each widget's text.
    pub fn visible_text(&self, resolve: &mut impl FnMut(&WidgetSlot) -> String) -> String {
        let mut out = String::new();
        self.push_visible(resolve, &mut out);
        out
    }

    pub(crate) fn push_visible(
        &self,
        resolve: &mut impl FnMut(&WidgetSlot) -> String,
        out: &mut String,
    ) {
        match self {
            Self::Text(t) => out.push_str(t),
            Self::Element(el) => {
                for child in &el.children {
                    child.push_visible(resolve, out);
                }
            }
            Self::Widget(w) => out.push_str(&resolve(w)),
        }
    }
}
