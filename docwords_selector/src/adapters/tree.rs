// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Docwords Tree.
//!
//! ## Feature
//!
//! Enable with `tree_adapter`.
//!
//! ## Notes
//!
//! [`WidgetSet`] owns one live widget per [`WidgetSlot`] of a rewritten tree,
//! keyed by [`WidgetKey`]. Re-rendering the same content and calling
//! [`WidgetSet::reconcile`] again keeps every widget (open panels, pending
//! issuance) because keys are stable. Slots that disappear are dropped, which
//! unmounts their panels and discards any in-flight issuance result.

use std::collections::BTreeMap;

use docwords_tree::{RenderedNode, WidgetKey, WidgetKind, WidgetSlot, for_each_widget};

use crate::context::KeywordContext;
use crate::issuance::OrgTokenCreator;
use crate::selector::KeywordSelector;
use crate::types::WidgetView;

/// A live widget for one slot.
#[derive(Debug)]
pub enum Widget {
    /// A keyword selector.
    Keyword(KeywordSelector),
    /// A token creator.
    OrgToken(OrgTokenCreator),
}

impl Widget {
    /// A fresh widget for `slot`.
    pub fn from_slot(slot: &WidgetSlot) -> Self {
        match &slot.kind {
            WidgetKind::Keyword {
                group,
                field,
                index,
            } => Self::Keyword(KeywordSelector::new(group.clone(), field.clone(), *index)),
            WidgetKind::OrgAuthToken => Self::OrgToken(OrgTokenCreator::new()),
        }
    }

    /// Render against `ctx`.
    pub fn render(&self, ctx: Option<&KeywordContext>) -> Option<WidgetView> {
        match self {
            Self::Keyword(w) => w.render(ctx),
            Self::OrgToken(w) => w.render(ctx),
        }
    }

    /// The selector, if this is one.
    pub fn as_keyword_mut(&mut self) -> Option<&mut KeywordSelector> {
        match self {
            Self::Keyword(w) => Some(w),
            Self::OrgToken(_) => None,
        }
    }

    /// The token creator, if this is one.
    pub fn as_token_mut(&mut self) -> Option<&mut OrgTokenCreator> {
        match self {
            Self::OrgToken(w) => Some(w),
            Self::Keyword(_) => None,
        }
    }
}

/// Counts from one [`WidgetSet::reconcile`] pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Widgets created for new slots.
    pub mounted: usize,
    /// Widgets kept from the previous pass.
    pub kept: usize,
    /// Widgets dropped because their slot disappeared or changed kind.
    pub unmounted: usize,
}

/// Live widgets of one rendered page, keyed by slot.
#[derive(Debug, Default)]
pub struct WidgetSet {
    widgets: BTreeMap<WidgetKey, (WidgetKind, Widget)>,
}

impl WidgetSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the set in line with the slots of `nodes`.
    ///
    /// A widget is kept when a slot with the same key and kind is still
    /// present; otherwise it is replaced or dropped.
    pub fn reconcile(&mut self, nodes: &[RenderedNode]) -> Reconciled {
        let mut previous = std::mem::take(&mut self.widgets);
        let mut counts = Reconciled::default();
        for_each_widget(nodes, &mut |slot| {
            let entry = match previous.remove(&slot.key) {
                Some((kind, widget)) if kind == slot.kind => {
                    counts.kept += 1;
                    (kind, widget)
                }
                stale => {
                    if stale.is_some() {
                        counts.unmounted += 1;
                    }
                    counts.mounted += 1;
                    (slot.kind.clone(), Widget::from_slot(slot))
                }
            };
            self.widgets.insert(slot.key.clone(), entry);
        });
        counts.unmounted += previous.len();
        tracing::debug!(
            mounted = counts.mounted,
            kept = counts.kept,
            unmounted = counts.unmounted,
            "widgets reconciled"
        );
        counts
    }

    /// The widget for `key`.
    pub fn get(&self, key: &WidgetKey) -> Option<&Widget> {
        self.widgets.get(key).map(|(_, w)| w)
    }

    /// The widget for `key`, mutably.
    pub fn get_mut(&mut self, key: &WidgetKey) -> Option<&mut Widget> {
        self.widgets.get_mut(key).map(|(_, w)| w)
    }

    /// The selector for `key`.
    pub fn keyword_mut(&mut self, key: &WidgetKey) -> Option<&mut KeywordSelector> {
        self.get_mut(key)?.as_keyword_mut()
    }

    /// The token creator for `key`.
    pub fn token_mut(&mut self, key: &WidgetKey) -> Option<&mut OrgTokenCreator> {
        self.get_mut(key)?.as_token_mut()
    }

    /// Drop the widget for `key`, unmounting it.
    pub fn remove(&mut self, key: &WidgetKey) -> Option<Widget> {
        self.widgets.remove(key).map(|(_, w)| w)
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &WidgetKey> {
        self.widgets.keys()
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Close every open keyword panel whose selection no longer resolves.
    ///
    /// Call after writing the shared store from outside a widget. Returns the
    /// number of panels closed.
    pub fn sync(&mut self, ctx: &KeywordContext) -> usize {
        self.widgets
            .values_mut()
            .filter_map(|(_, widget)| widget.as_keyword_mut())
            .map(|selector| selector.sync(ctx))
            .filter(|&closed| closed)
            .count()
    }

    /// Visible text of `nodes`, with every slot rendered by its widget.
    ///
    /// Slots without a live widget render as a fresh widget would.
    pub fn render_text(&self, nodes: &[RenderedNode], ctx: Option<&KeywordContext>) -> String {
        docwords_tree::visible_text(nodes, |slot| {
            let view = match self.get(&slot.key) {
                Some(widget) => widget.render(ctx),
                None => Widget::from_slot(slot).render(ctx),
            };
            view.map(|v| v.text().to_owned()).unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docwords_tree::{ContentNode, rewrite};

    fn page(text: &str) -> Vec<RenderedNode> {
        rewrite(&[ContentNode::text(text)])
    }

    #[test]
    fn reconcile_keeps_identical_slots() {
        let nodes = page("a ___PROJECT.DSN___ b");
        let mut set = WidgetSet::new();
        assert_eq!(
            set.reconcile(&nodes),
            Reconciled {
                mounted: 1,
                kept: 0,
                unmounted: 0
            }
        );
        assert_eq!(
            set.reconcile(&nodes),
            Reconciled {
                mounted: 0,
                kept: 1,
                unmounted: 0
            }
        );
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn reconcile_drops_missing_slots() {
        let mut set = WidgetSet::new();
        set.reconcile(&page("___PROJECT.DSN___ and ___PROJECT.ID___"));
        assert_eq!(set.len(), 2);
        let counts = set.reconcile(&page("nothing here"));
        assert_eq!(counts.unmounted, 2);
        assert!(set.is_empty());
    }

    #[test]
    fn sync_closes_panels_left_without_a_choice() {
        use crate::dictionary::{Choice, Dictionary};

        let ctx = KeywordContext::new(
            Dictionary::new().with_group("PROJECT", vec![Choice::new("A"), Choice::new("B")]),
        );
        let nodes = page("___PROJECT.DSN___ and ___PROJECT.ORG_SLUG___");
        let mut set = WidgetSet::new();
        set.reconcile(&nodes);
        let keys: Vec<_> = set.keys().cloned().collect();
        for key in &keys {
            assert!(set.keyword_mut(key).unwrap().activate(&ctx));
        }
        assert_eq!(set.sync(&ctx), 0);
        assert_eq!(ctx.overlay().borrow().len(), 2);

        ctx.store().write("PROJECT", 9);
        assert_eq!(set.sync(&ctx), 2);
        assert!(ctx.overlay().borrow().is_empty());
    }

    #[test]
    fn typed_accessors() {
        let nodes = page("___ORG_AUTH_TOKEN___");
        let mut set = WidgetSet::new();
        set.reconcile(&nodes);
        let key = set.keys().next().unwrap().clone();
        assert!(set.token_mut(&key).is_some());
        assert!(set.keyword_mut(&key).is_none());
        assert!(set.remove(&key).is_some());
        assert!(set.is_empty());
    }
}
