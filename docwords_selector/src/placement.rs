// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Floating panel placement.
//!
//! ## Overview
//!
//! Placement is a pure function of three rectangles: the anchor (the inline
//! keyword), the panel size, and the viewport. [`Positioner`] is the seam; the
//! [`overlay`](crate::overlay) root calls it whenever an anchor, a panel, or
//! the viewport changes.
//!
//! ## Default policy
//!
//! [`PopperPositioner`] mirrors the usual dropdown behavior:
//!
//! - The panel sits on the preferred [`Side`] of the anchor, `distance` away,
//!   centred on the anchor and moved by `skidding` along the cross axis.
//! - With `flip` enabled, the panel moves to the opposite side when the
//!   preferred side overflows the viewport and the opposite side does not.
//! - The panel is shifted along the cross axis to stay inside the viewport
//!   (minus `viewport_padding`). A panel wider than the viewport is aligned to
//!   its left edge.
//! - The arrow points at the anchor's centre and is clamped to stay
//!   `arrow_padding` away from the panel's edges.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Which side of the anchor the panel is placed on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Above the anchor.
    Top,
    /// Below the anchor.
    #[default]
    Bottom,
}

impl Side {
    /// The other side.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

/// Tunables for placement.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionOptions {
    /// Preferred side.
    pub side: Side,
    /// Cross-axis displacement.
    pub skidding: f64,
    /// Gap between anchor and panel along the main axis.
    pub distance: f64,
    /// Whether to flip to the opposite side on overflow.
    pub flip: bool,
    /// Margin kept between the panel and the viewport edges.
    pub viewport_padding: f64,
    /// Arrow width.
    pub arrow_width: f64,
    /// Minimum distance between the arrow and the panel's edges.
    pub arrow_padding: f64,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            side: Side::Bottom,
            skidding: 0.0,
            distance: 10.0,
            flip: true,
            viewport_padding: 0.0,
            arrow_width: 10.0,
            arrow_padding: 0.0,
        }
    }
}

/// A computed placement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Position {
    /// Top-left corner of the panel in viewport coordinates.
    pub origin: Point,
    /// Side actually used (after flipping).
    pub side: Side,
    /// Arrow offset from the panel's left edge.
    pub arrow_offset: f64,
}

impl Position {
    /// The panel rectangle for a panel of `size`.
    pub fn rect(&self, size: Size) -> Rect {
        Rect::from_origin_size(self.origin, size)
    }
}

/// Computes panel placement from anchor and viewport geometry.
pub trait Positioner {
    /// Place a panel of `panel` size relative to `anchor` inside `viewport`.
    fn compute(
        &self,
        anchor: Rect,
        panel: Size,
        viewport: Rect,
        options: &PositionOptions,
    ) -> Position;
}

/// Default dropdown placement. See the [module docs](self).
#[derive(Copy, Clone, Debug, Default)]
pub struct PopperPositioner;

impl PopperPositioner {
    fn main_axis(anchor: Rect, panel: Size, side: Side, distance: f64) -> f64 {
        match side {
            Side::Bottom => anchor.y1 + distance,
            Side::Top => anchor.y0 - distance - panel.height,
        }
    }

    fn overflow(y: f64, panel: Size, side: Side, viewport: Rect, padding: f64) -> f64 {
        match side {
            Side::Bottom => (y + panel.height) - (viewport.y1 - padding),
            Side::Top => (viewport.y0 + padding) - y,
        }
    }
}

impl Positioner for PopperPositioner {
    fn compute(
        &self,
        anchor: Rect,
        panel: Size,
        viewport: Rect,
        options: &PositionOptions,
    ) -> Position {
        let pad = options.viewport_padding;

        let mut side = options.side;
        let mut y = Self::main_axis(anchor, panel, side, options.distance);
        if options.flip && Self::overflow(y, panel, side, viewport, pad) > 0.0 {
            let alt = side.opposite();
            let alt_y = Self::main_axis(anchor, panel, alt, options.distance);
            if Self::overflow(alt_y, panel, alt, viewport, pad) <= 0.0 {
                side = alt;
                y = alt_y;
            }
        }

        let centre = anchor.center().x;
        let min_x = viewport.x0 + pad;
        let max_x = viewport.x1 - pad - panel.width;
        let mut x = centre - panel.width / 2.0 + options.skidding;
        if max_x < min_x {
            x = min_x;
        } else {
            x = x.clamp(min_x, max_x);
        }

        let arrow_min = options.arrow_padding;
        let arrow_max = (panel.width - options.arrow_width - options.arrow_padding).max(arrow_min);
        let arrow_offset = (centre - x - options.arrow_width / 2.0).clamp(arrow_min, arrow_max);

        Position {
            origin: Point::new(x, y),
            side,
            arrow_offset,
        }
    }
}
