// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outside-pointer dismissal.
//!
//! An open dropdown closes when a pointer goes down anywhere except its anchor
//! or its panel. Presses on the anchor are left to the anchor's own activation
//! so that clicking an open keyword toggles it closed exactly once.

use kurbo::{Point, Rect};

/// Where a pointer-down landed relative to an open dropdown.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerRegion {
    /// On the inline keyword.
    Anchor,
    /// Inside the floating panel.
    Panel,
    /// Anywhere else; the dropdown should close.
    Outside,
}

/// Classify `point` against the anchor and the (optional) panel rectangle.
///
/// Edges count as inside.
pub fn classify(point: Point, anchor: Rect, panel: Option<Rect>) -> PointerRegion {
    if contains(anchor, point) {
        PointerRegion::Anchor
    } else if panel.is_some_and(|p| contains(p, point)) {
        PointerRegion::Panel
    } else {
        PointerRegion::Outside
    }
}

fn contains(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHOR: Rect = Rect::new(10.0, 10.0, 60.0, 30.0);
    const PANEL: Rect = Rect::new(0.0, 40.0, 300.0, 140.0);

    #[test]
    fn regions() {
        assert_eq!(
            classify(Point::new(20.0, 20.0), ANCHOR, Some(PANEL)),
            PointerRegion::Anchor
        );
        assert_eq!(
            classify(Point::new(150.0, 100.0), ANCHOR, Some(PANEL)),
            PointerRegion::Panel
        );
        assert_eq!(
            classify(Point::new(500.0, 500.0), ANCHOR, Some(PANEL)),
            PointerRegion::Outside
        );
    }

    #[test]
    fn edges_are_inside() {
        assert_eq!(
            classify(Point::new(60.0, 30.0), ANCHOR, None),
            PointerRegion::Anchor
        );
        assert_eq!(
            classify(Point::new(300.0, 140.0), ANCHOR, Some(PANEL)),
            PointerRegion::Panel
        );
    }

    #[test]
    fn without_panel_only_anchor_counts() {
        assert_eq!(
            classify(Point::new(150.0, 100.0), ANCHOR, None),
            PointerRegion::Outside
        );
    }
}
