// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The inline keyword selector.
//!
//! ## Behavior
//!
//! A [`KeywordSelector`] shows one field of the choice currently selected for
//! its group. Activating it (click, Enter, or Space) toggles a panel listing
//! every choice in the group; choosing one writes the page's
//! [`SelectionStore`](crate::SelectionStore) and closes the panel. An outside
//! press or Escape also closes it.
//!
//! Rendering degrades rather than fails:
//!
//! - Without a context, nothing is rendered.
//! - When the group is absent or the selected index is out of range, an inert
//!   fallback label is rendered.
//! - When the choice exists but lacks the field, the fallback label is shown on
//!   a live button, so picking another choice can still resolve it.
//!
//! ```
//! use docwords_selector::{Choice, Dictionary, KeywordContext, KeywordSelector};
//!
//! let dict = Dictionary::new().with_group(
//!     "PROJECT",
//!     vec![
//!         Choice::new("A").with_field("DSN", "dsn-a"),
//!         Choice::new("B").with_field("DSN", "dsn-b"),
//!     ],
//! );
//! let ctx = KeywordContext::new(dict);
//! let mut selector = KeywordSelector::new("PROJECT", "DSN", 0);
//!
//! assert_eq!(selector.render(Some(&ctx)).unwrap().text(), "dsn-a");
//! selector.activate(&ctx);
//! selector.choose(&ctx, 1);
//! assert_eq!(selector.render(Some(&ctx)).unwrap().text(), "dsn-b");
//! assert!(!selector.is_open());
//! ```

use kurbo::{Point, Rect, Size};

use crate::context::KeywordContext;
use crate::dictionary::Choice;
use crate::dropdown::Dropdown;
use crate::types::{ButtonView, Key, PanelItem, PanelView, WidgetFlags, WidgetView};

/// A keyword bound to `group` and `field`.
#[derive(Debug)]
pub struct KeywordSelector {
    group: String,
    field: String,
    index: usize,
    dropdown: Dropdown,
}

impl KeywordSelector {
    /// Create a closed selector. `index` only disambiguates render keys.
    pub fn new(group: impl Into<String>, field: impl Into<String>, index: usize) -> Self {
        Self {
            group: group.into(),
            field: field.into(),
            index,
            dropdown: Dropdown::default(),
        }
    }

    /// Group name.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Render-key index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the panel is open.
    pub fn is_open(&self) -> bool {
        self.dropdown.is_open()
    }

    /// Current state flags.
    pub fn flags(&self) -> WidgetFlags {
        self.dropdown.flags()
    }

    /// Anchor rectangle last reported by the host.
    pub fn anchor(&self) -> Rect {
        self.dropdown.anchor()
    }

    /// Report the inline keyword's rectangle; an open panel follows it.
    pub fn set_anchor(&mut self, anchor: Rect) {
        self.dropdown.set_anchor(anchor);
    }

    fn current<'c>(&self, ctx: &'c KeywordContext) -> Option<(usize, &'c Choice)> {
        let idx = ctx.store().read(&self.group);
        let choice = ctx.dictionary().group(&self.group)?.get(idx)?;
        Some((idx, choice))
    }

    fn panel_size(&self, ctx: &KeywordContext) -> Size {
        let items = ctx.dictionary().choices(&self.group).len();
        ctx.config().panel.panel_size(items, false)
    }

    /// Toggle the panel. Returns whether it is now open.
    ///
    /// Ignored while the selection does not resolve to a choice; a panel left
    /// open from before is closed.
    pub fn activate(&mut self, ctx: &KeywordContext) -> bool {
        if self.sync(ctx) || self.current(ctx).is_none() {
            tracing::debug!(group = %self.group, "activation ignored: no current choice");
            return false;
        }
        let open = self.dropdown.toggle(ctx.overlay(), self.panel_size(ctx));
        tracing::debug!(group = %self.group, field = %self.field, open, "keyword toggled");
        open
    }

    /// Close the panel if the selection no longer resolves to a choice.
    ///
    /// Call after the store or dictionary changes under an open panel.
    /// Returns whether the panel was closed.
    pub fn sync(&mut self, ctx: &KeywordContext) -> bool {
        if self.is_open() && self.current(ctx).is_none() {
            tracing::debug!(group = %self.group, "selection no longer resolves");
            return self.close();
        }
        false
    }

    /// Handle a key press while focused. Returns whether the panel is open.
    pub fn handle_key(&mut self, key: Key, ctx: &KeywordContext) -> bool {
        if key.activates() {
            self.activate(ctx)
        } else {
            if key == Key::Escape {
                self.close();
            }
            self.is_open()
        }
    }

    /// Select choice `index` of the group, then close.
    ///
    /// Returns `false` and changes nothing if `index` is out of range.
    pub fn choose(&mut self, ctx: &KeywordContext, index: usize) -> bool {
        let len = ctx.dictionary().choices(&self.group).len();
        if index >= len {
            tracing::debug!(group = %self.group, index, len, "choice out of range");
            return false;
        }
        ctx.store().write(&self.group, index);
        self.close();
        true
    }

    /// Close the panel. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        let closed = self.dropdown.close();
        if closed {
            tracing::debug!(group = %self.group, "keyword closed");
        }
        closed
    }

    /// A pointer went down at `point`; closes on outside presses.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        self.dropdown.pointer_down(point)
    }

    /// The label swap animation started.
    pub fn animation_started(&mut self) {
        self.dropdown.animation_started();
    }

    /// The label swap animation finished; the transient layout is dropped.
    pub fn animation_finished(&mut self) {
        self.dropdown.animation_finished();
    }

    /// Render against `ctx`; `None` without a context.
    pub fn render(&self, ctx: Option<&KeywordContext>) -> Option<WidgetView> {
        let ctx = ctx?;
        let config = ctx.config();
        let Some((idx, choice)) = self.current(ctx) else {
            return Some(WidgetView::Text(config.fallback_label.clone()));
        };
        let label = choice
            .field(&self.field)
            .map_or_else(|| config.fallback_label.clone(), |v| v.into_owned());

        let panel = self.is_open().then(|| {
            let choices = ctx.dictionary().choices(&self.group);
            PanelView {
                header: None,
                items: choices
                    .iter()
                    .enumerate()
                    .map(|(i, c)| PanelItem {
                        label: c.title.clone(),
                        active: i == idx,
                    })
                    .collect(),
                position: self.dropdown.position(),
                size: config.panel.panel_size(choices.len(), false),
            }
        });

        Some(WidgetView::Button(ButtonView {
            title: choice.title.clone(),
            label,
            label_key: idx,
            indicator: Some(self.dropdown.indicator()),
            display: self.dropdown.display(),
            panel,
        }))
    }
}
