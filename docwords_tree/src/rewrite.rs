// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The keyword rewriter.
//!
//! ## Rules
//!
//! - Elements are cloned with tag and attributes untouched; their children are
//!   rewritten recursively.
//! - Text leaves are scanned. Literal segments become [`RenderedNode::Text`],
//!   markers become [`RenderedNode::Widget`].
//! - Traversal is depth-first, left to right, and keys depend only on the
//!   input, so rewriting the same input twice yields identical output.
//! - The input is never mutated.

use docwords_scanner::{DEFAULT_GROUP, Grammar, Segment, scan};

use crate::types::{
    ContentNode, Element, KeyPrefix, RenderedElement, RenderedNode, WidgetKey, WidgetKind,
    WidgetSlot,
};

/// Rewrites content trees, replacing markers with widget slots.
#[derive(Clone, Debug)]
pub struct Rewriter {
    default_group: String,
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Rewriter {
    /// Create a rewriter that assigns [`DEFAULT_GROUP`] to markers without a group.
    pub fn new() -> Self {
        Self {
            default_group: DEFAULT_GROUP.into(),
        }
    }

    /// Builder: use `group` for markers that omit `GROUP.`.
    pub fn with_default_group(mut self, group: impl Into<String>) -> Self {
        self.default_group = group.into();
        self
    }

    /// The group used for markers that omit one.
    pub fn default_group(&self) -> &str {
        &self.default_group
    }

    /// Rewrite a list of sibling nodes.
    pub fn rewrite(&self, nodes: &[ContentNode]) -> Vec<RenderedNode> {
        let mut path = Vec::new();
        let mut out = Vec::with_capacity(nodes.len());
        self.rewrite_children(nodes, &mut path, &mut out);
        out
    }

    /// Rewrite a single node as if it were the only root.
    ///
    /// A text node may expand into several rendered nodes; an element always
    /// yields exactly one.
    pub fn rewrite_node(&self, node: &ContentNode) -> Vec<RenderedNode> {
        self.rewrite(core::slice::from_ref(node))
    }

    /// Rewrite an element as a root.
    pub fn rewrite_element(&self, el: &Element) -> RenderedElement {
        let mut path = vec![0];
        self.rewrite_element_at(el, &mut path)
    }

    fn rewrite_children(
        &self,
        nodes: &[ContentNode],
        path: &mut Vec<usize>,
        out: &mut Vec<RenderedNode>,
    ) {
        for (slot, node) in nodes.iter().enumerate() {
            path.push(slot);
            match node {
                ContentNode::Text(text) => self.rewrite_text(text, path, out),
                ContentNode::Element(el) => {
                    out.push(RenderedNode::Element(self.rewrite_element_at(el, path)));
                }
            }
            path.pop();
        }
    }

    fn rewrite_element_at(&self, el: &Element, path: &mut Vec<usize>) -> RenderedElement {
        let mut children = Vec::with_capacity(el.children.len());
        self.rewrite_children(&el.children, path, &mut children);
        RenderedElement {
            tag: el.tag.clone(),
            attrs: el.attrs.clone(),
            children,
        }
    }

    fn rewrite_text(&self, text: &str, path: &[usize], out: &mut Vec<RenderedNode>) {
        for segment in scan(text) {
            match segment {
                Segment::Literal(lit) => out.push(RenderedNode::Text(lit.into())),
                Segment::Marker(marker) => {
                    let (prefix, kind) = match marker.grammar {
                        Grammar::OrgAuthToken => (KeyPrefix::OrgToken, WidgetKind::OrgAuthToken),
                        Grammar::Keyword => (
                            KeyPrefix::ProjectKeyword,
                            WidgetKind::Keyword {
                                group: marker.group_or(&self.default_group).into(),
                                field: marker.field.into(),
                                index: marker.start(),
                            },
                        ),
                    };
                    out.push(RenderedNode::Widget(WidgetSlot {
                        key: WidgetKey {
                            prefix,
                            path: path.to_vec(),
                            offset: marker.start(),
                        },
                        kind,
                        source: marker.source.into(),
                    }));
                }
            }
        }
    }
}

/// Rewrite `nodes` with a default [`Rewriter`].
pub fn rewrite(nodes: &[ContentNode]) -> Vec<RenderedNode> {
    Rewriter::new().rewrite(nodes)
}

/// Visible text of a rendered node list, asking `resolve` for each widget.
pub fn visible_text(
    nodes: &[RenderedNode],
    mut resolve: impl FnMut(&WidgetSlot) -> String,
) -> String {
    let mut out = String::new();
    for node in nodes {
        node.push_visible(&mut resolve, &mut out);
    }
    out
}

/// Visit every widget slot depth-first, left to right.
pub fn for_each_widget<'a>(nodes: &'a [RenderedNode], f: &mut impl FnMut(&'a WidgetSlot)) {
    for node in nodes {
        match node {
            RenderedNode::Widget(w) => f(w),
            RenderedNode::Element(el) => for_each_widget(&el.children, f),
            RenderedNode::Text(_) => {}
        }
    }
}

/// Collect every widget slot depth-first, left to right.
pub fn widgets(nodes: &[RenderedNode]) -> Vec<&WidgetSlot> {
    let mut out = Vec::new();
    for_each_widget(nodes, &mut |w| out.push(w));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keyword(group: &str, field: &str, path: Vec<usize>, offset: usize) -> RenderedNode {
        RenderedNode::Widget(WidgetSlot {
            key: WidgetKey {
                prefix: KeyPrefix::ProjectKeyword,
                path,
                offset,
            },
            kind: WidgetKind::Keyword {
                group: group.into(),
                field: field.into(),
                index: offset,
            },
            source: format!("___{group}.{field}___"),
        })
    }

    #[test]
    fn literal_and_widget_for_marker() {
        let out = rewrite(&[ContentNode::text("key: ___PROJECT.DSN___")]);
        assert_eq!(
            out,
            vec![
                RenderedNode::Text("key: ".into()),
                keyword("PROJECT", "DSN", vec![0], 5),
            ]
        );
    }

    #[test]
    fn text_without_markers_is_unchanged() {
        let tree = Element::new("pre")
            .with_attr("class", "language-python")
            .with_child(Element::new("code").with_child("import sentry_sdk\n"))
            .with_child("sentry_sdk.init()");
        let input = vec![ContentNode::from(tree.clone())];
        let out = rewrite(&input);
        assert_eq!(
            visible_text(&out, |_| unreachable!("no widgets expected")),
            input[0].text_content()
        );
        let RenderedNode::Element(pre) = &out[0] else {
            panic!("expected element");
        };
        assert_eq!(pre.tag, "pre");
        assert_eq!(pre.attrs, tree.attrs);
    }

    #[test]
    fn nested_elements_keep_structure_and_attributes() {
        let input = vec![ContentNode::from(
            Element::new("code")
                .with_attr("data-lang", "js")
                .with_child("dsn: '")
                .with_child(Element::new("span").with_child("___DSN___"))
                .with_child("'"),
        )];
        let out = rewrite(&input);
        let RenderedNode::Element(code) = &out[0] else {
            panic!("expected element");
        };
        assert_eq!(code.attrs.get("data-lang").map(String::as_str), Some("js"));
        assert_eq!(code.children.len(), 3);
        let RenderedNode::Element(span) = &code.children[1] else {
            panic!("expected span");
        };
        let slot = span.children[0].as_widget().unwrap();
        assert_eq!(slot.key.path, vec![0, 1, 0]);
        assert_eq!(
            slot.kind,
            WidgetKind::Keyword {
                group: "PROJECT".into(),
                field: "DSN".into(),
                index: 0,
            }
        );
        assert_eq!(slot.source, "___DSN___");
    }

    #[test]
    fn rewriting_twice_is_identical() {
        let input = vec![
            ContentNode::text("a ___X___ b ___USER.NAME___"),
            Element::new("p")
                .with_child("t=___ORG_AUTH_TOKEN___")
                .with_child("___Y___")
                .into(),
        ];
        let rewriter = Rewriter::new();
        let first = rewriter.rewrite(&input);
        let second = rewriter.rewrite(&input);
        assert_eq!(first, second);
        let keys: Vec<String> = widgets(&first).iter().map(|w| w.key.to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "project-keyword-0:2",
                "project-keyword-0:12",
                "org-token-1.0:2",
                "project-keyword-1.1:0",
            ]
        );
    }

    #[test]
    fn sibling_text_leaves_get_distinct_keys() {
        let input = vec![ContentNode::text("___A___"), ContentNode::text("___B___")];
        let out = rewrite(&input);
        let slots = widgets(&out);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].key.offset, slots[1].key.offset);
        assert_ne!(slots[0].key, slots[1].key);
    }

    #[test]
    fn org_token_and_keyword_keys_never_collide() {
        let out = rewrite(&[
            ContentNode::text("___ORG_AUTH_TOKEN___"),
            ContentNode::text("___ORG_AUTH_TOKEN___ ___DSN___"),
        ]);
        let slots = widgets(&out);
        assert!(slots.iter().all(|w| w.kind == WidgetKind::OrgAuthToken));
        assert_eq!(slots[0].key.prefix, KeyPrefix::OrgToken);
        // The keyword stays literal in a string that holds the token marker.
        assert_eq!(out.last(), Some(&RenderedNode::Text(" ___DSN___".into())));
    }

    #[test]
    fn custom_default_group() {
        let out = Rewriter::new()
            .with_default_group("USER")
            .rewrite(&[ContentNode::text("___NAME___")]);
        let slot = out[0].as_widget().unwrap();
        assert!(matches!(&slot.kind, WidgetKind::Keyword { group, .. } if group == "USER"));
    }

    #[test]
    fn rewrite_element_root() {
        let el = Element::new("p").with_child("x ___Y___");
        let out = Rewriter::new().rewrite_element(&el);
        assert_eq!(out.children.len(), 2);
        assert_eq!(out.children[1].as_widget().unwrap().key.path, vec![0, 0]);
        assert_eq!(Rewriter::new().rewrite_node(&el.into()).len(), 1);
    }

    #[test]
    fn content_round_trips_through_json() {
        let json = r#"[{"element":{"tag":"code","children":[{"text":"___DSN___"}]}}]"#;
        let nodes: Vec<ContentNode> = serde_json::from_str(json).unwrap();
        let out = rewrite(&nodes);
        assert_eq!(widgets(&out).len(), 1);
    }
}
