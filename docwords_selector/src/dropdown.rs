// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Open/close bookkeeping shared by the keyword and token widgets.

use kurbo::{Point, Rect, Size};

use crate::dismiss::{PointerRegion, classify};
use crate::overlay::{LayerHandle, SharedOverlay};
use crate::placement::Position;
use crate::types::{Indicator, LabelDisplay, WidgetFlags};

/// Dropdown state: flags, the anchor rectangle, and the mounted layer.
///
/// The panel is mounted exactly while `OPEN` is set; dropping the state (or
/// closing) drops the [`LayerHandle`], which unmounts the layer.
#[derive(Debug, Default)]
pub(crate) struct Dropdown {
    flags: WidgetFlags,
    anchor: Rect,
    layer: Option<LayerHandle>,
}

impl Dropdown {
    pub(crate) fn is_open(&self) -> bool {
        self.flags.contains(WidgetFlags::OPEN)
    }

    pub(crate) fn flags(&self) -> WidgetFlags {
        self.flags
    }

    pub(crate) fn anchor(&self) -> Rect {
        self.anchor
    }

    pub(crate) fn set_anchor(&mut self, anchor: Rect) {
        self.anchor = anchor;
        if let Some(layer) = &self.layer {
            layer.set_anchor(anchor);
        }
    }

    pub(crate) fn open(&mut self, overlay: &SharedOverlay, size: Size) {
        if self.is_open() {
            self.resize(size);
            return;
        }
        self.layer = Some(LayerHandle::mount(overlay, self.anchor, size));
        self.flags.insert(WidgetFlags::OPEN);
    }

    /// Close the panel. Returns whether it was open.
    pub(crate) fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.layer = None;
        self.flags.remove(WidgetFlags::OPEN);
        was_open
    }

    /// Toggle the panel. Returns whether it is now open.
    pub(crate) fn toggle(&mut self, overlay: &SharedOverlay, size: Size) -> bool {
        if self.close() {
            false
        } else {
            self.open(overlay, size);
            true
        }
    }

    pub(crate) fn resize(&self, size: Size) {
        if let Some(layer) = &self.layer {
            layer.set_size(size);
        }
    }

    /// Close on an outside press. Returns whether the panel closed.
    pub(crate) fn pointer_down(&mut self, point: Point) -> bool {
        if !self.is_open() {
            return false;
        }
        let panel = self.layer.as_ref().and_then(LayerHandle::panel_rect);
        match classify(point, self.anchor, panel) {
            PointerRegion::Outside => self.close(),
            PointerRegion::Anchor | PointerRegion::Panel => false,
        }
    }

    pub(crate) fn animation_started(&mut self) {
        self.flags.insert(WidgetFlags::ANIMATING);
    }

    pub(crate) fn animation_finished(&mut self) {
        self.flags.remove(WidgetFlags::ANIMATING);
    }

    pub(crate) fn display(&self) -> LabelDisplay {
        if self.flags.contains(WidgetFlags::ANIMATING) {
            LabelDisplay::InlineGrid
        } else {
            LabelDisplay::Inline
        }
    }

    pub(crate) fn indicator(&self) -> Indicator {
        Indicator {
            rotated: self.is_open(),
        }
    }

    pub(crate) fn position(&self) -> Option<Position> {
        self.layer.as_ref()?.position()
    }
}
