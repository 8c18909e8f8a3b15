// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget state flags, input keys, and render output.

use kurbo::Size;

use crate::placement::Position;

bitflags::bitflags! {
    /// Transient dropdown state.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct WidgetFlags: u8 {
        /// The panel is open.
        const OPEN = 1 << 0;
        /// A value-change animation is running.
        const ANIMATING = 1 << 1;
    }
}

/// Keys a focused keyword reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// Activates (toggles) the widget.
    Enter,
    /// Activates (toggles) the widget.
    Space,
    /// Closes an open panel.
    Escape,
    /// Ignored.
    Other,
}

impl Key {
    /// Whether the key activates a focused widget.
    pub const fn activates(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// How the inline label is laid out.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LabelDisplay {
    /// Plain inline text.
    #[default]
    Inline,
    /// Inline grid, so outgoing and incoming labels overlap while animating.
    InlineGrid,
}

/// Dropdown indicator next to the label.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Indicator {
    /// Rotated while the panel is open.
    pub rotated: bool,
}

/// One row of a dropdown panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelItem {
    /// Row label.
    pub label: String,
    /// Whether this row is the current choice.
    pub active: bool,
}

/// An open dropdown panel.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelView {
    /// Optional header above the items.
    pub header: Option<String>,
    /// Rows in order.
    pub items: Vec<PanelItem>,
    /// Placement, if the panel is mounted on an overlay.
    pub position: Option<Position>,
    /// Estimated panel size.
    pub size: Size,
}

impl PanelView {
    /// Index of the active row.
    pub fn active(&self) -> Option<usize> {
        self.items.iter().position(|i| i.active)
    }
}

/// A clickable inline control.
#[derive(Clone, Debug, PartialEq)]
pub struct ButtonView {
    /// Tooltip.
    pub title: String,
    /// Visible label.
    pub label: String,
    /// Identity of the label; a change of key animates the label swap.
    pub label_key: usize,
    /// Dropdown indicator, if the control opens a panel.
    pub indicator: Option<Indicator>,
    /// Label layout.
    pub display: LabelDisplay,
    /// The open panel, if any.
    pub panel: Option<PanelView>,
}

/// What a widget renders in place of its marker.
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetView {
    /// Non-interactive text.
    Text(String),
    /// An interactive control.
    Button(ButtonView),
}

impl WidgetView {
    /// The visible inline text.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(t) => t,
            Self::Button(b) => &b.label,
        }
    }

    /// The control, if interactive.
    pub fn as_button(&self) -> Option<&ButtonView> {
        match self {
            Self::Button(b) => Some(b),
            Self::Text(_) => None,
        }
    }

    /// The open panel, if any.
    pub fn panel(&self) -> Option<&PanelView> {
        self.as_button()?.panel.as_ref()
    }
}
