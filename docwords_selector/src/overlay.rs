// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page-level overlay root that floating panels mount into.
//!
//! ## Overview
//!
//! Every open dropdown on a page is a *layer* of one [`OverlayRoot`]. A layer
//! records the anchor rectangle and panel size it was mounted with and the
//! [`Position`] last computed for it. Changing an anchor, a panel size, or the
//! viewport recomputes the affected layers through the root's [`Positioner`].
//!
//! Mounting a layer is the positioning subscription: while mounted, the layer
//! follows geometry changes; once unmounted, nothing refers to it. Widgets hold
//! a [`LayerHandle`], which unmounts its layer when dropped, so a closed panel
//! or an unmounted widget never leaves a layer behind.
//!
//! [`LayerId`]s are generational: a stale id never aliases a later layer that
//! reuses the same slot.
//!
//! A handle dropped while the root is borrowed cannot unmount right away. Its
//! layer is queued instead: it stops counting as mounted at once and its slot
//! is freed by the root's next mutation.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use kurbo::{Rect, Size};

use crate::placement::{PopperPositioner, Position, PositionOptions, Positioner};

/// Identifier of a mounted layer (slot index and generation).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LayerId(u32, u32);

impl LayerId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Layer {
    generation: u32,
    anchor: Rect,
    size: Size,
    position: Position,
}

/// Shared handle to a page's overlay root.
pub type SharedOverlay = Rc<RefCell<OverlayRoot>>;

/// Container for every floating panel on a page.
pub struct OverlayRoot {
    layers: Vec<Option<Layer>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    viewport: Rect,
    options: PositionOptions,
    positioner: Box<dyn Positioner>,
    // Layers whose handles were dropped while the root was borrowed.
    pending_unmount: Rc<RefCell<Vec<LayerId>>>,
}

impl fmt::Debug for OverlayRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayRoot")
            .field("mounted", &self.len())
            .field("free_list", &self.free_list.len())
            .field("viewport", &self.viewport)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl OverlayRoot {
    /// A root using [`PopperPositioner`] with default options.
    pub fn new(viewport: Rect) -> Self {
        Self::with_positioner(viewport, PositionOptions::default(), PopperPositioner)
    }

    /// A root with explicit options and positioner.
    pub fn with_positioner(
        viewport: Rect,
        options: PositionOptions,
        positioner: impl Positioner + 'static,
    ) -> Self {
        Self {
            layers: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            viewport,
            options,
            positioner: Box::new(positioner),
            pending_unmount: Rc::default(),
        }
    }

    /// Wrap in a shared handle.
    pub fn shared(self) -> SharedOverlay {
        Rc::new(RefCell::new(self))
    }

    /// The current viewport.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// The placement options applied to every layer.
    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    /// Replace the placement options and reposition every layer.
    pub fn set_options(&mut self, options: PositionOptions) {
        self.reap();
        self.options = options;
        self.reposition_all();
    }

    /// Mount a panel of `size` anchored at `anchor`.
    pub fn mount(&mut self, anchor: Rect, size: Size) -> LayerId {
        self.reap();
        let position = self.compute(anchor, size);
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.layers.push(None);
            self.generations.push(1);
            (self.layers.len() - 1, 1)
        };
        self.layers[idx] = Some(Layer {
            generation,
            anchor,
            size,
            position,
        });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "LayerId uses 32-bit indices by design."
        )]
        let id = LayerId(idx as u32, generation);
        tracing::debug!(?id, ?anchor, "overlay layer mounted");
        id
    }

    /// Unmount a layer. Returns `false` if it was not mounted.
    pub fn unmount(&mut self, id: LayerId) -> bool {
        self.reap();
        self.release(id)
    }

    fn release(&mut self, id: LayerId) -> bool {
        if self.raw_layer(id).is_none() {
            return false;
        }
        self.layers[id.idx()] = None;
        self.free_list.push(id.idx());
        tracing::debug!(?id, "overlay layer unmounted");
        true
    }

    fn reap(&mut self) {
        let pending = std::mem::take(&mut *self.pending_unmount.borrow_mut());
        for id in pending {
            self.release(id);
        }
    }

    /// Whether `id` refers to a mounted layer.
    pub fn is_mounted(&self, id: LayerId) -> bool {
        self.layer(id).is_some()
    }

    /// Move a layer's anchor and reposition it.
    pub fn set_anchor(&mut self, id: LayerId, anchor: Rect) {
        self.reap();
        self.update(id, |layer| layer.anchor = anchor);
    }

    /// Resize a layer's panel and reposition it.
    pub fn set_size(&mut self, id: LayerId, size: Size) {
        self.reap();
        self.update(id, |layer| layer.size = size);
    }

    /// Change the viewport and reposition every layer.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.reap();
        self.viewport = viewport;
        self.reposition_all();
    }

    /// Last computed position of a layer.
    pub fn position(&self, id: LayerId) -> Option<Position> {
        self.layer(id).map(|l| l.position)
    }

    /// Panel rectangle of a layer.
    pub fn panel_rect(&self, id: LayerId) -> Option<Rect> {
        self.layer(id).map(|l| l.position.rect(l.size))
    }

    /// Number of mounted layers.
    pub fn len(&self) -> usize {
        let pending = self
            .pending_unmount
            .borrow()
            .iter()
            .filter(|&&id| self.raw_layer(id).is_some())
            .count();
        self.layers.iter().filter(|l| l.is_some()).count() - pending
    }

    /// Whether no layer is mounted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.raw_layer(id)
            .filter(|_| !self.pending_unmount.borrow().contains(&id))
    }

    fn raw_layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers
            .get(id.idx())?
            .as_ref()
            .filter(|l| l.generation == id.1)
    }

    fn compute(&self, anchor: Rect, size: Size) -> Position {
        self.positioner
            .compute(anchor, size, self.viewport, &self.options)
    }

    fn update(&mut self, id: LayerId, f: impl FnOnce(&mut Layer)) {
        let Some(mut layer) = self.layer(id).cloned() else {
            return;
        };
        f(&mut layer);
        layer.position = self.compute(layer.anchor, layer.size);
        tracing::trace!(?id, position = ?layer.position, "overlay layer repositioned");
        self.layers[id.idx()] = Some(layer);
    }

    fn reposition_all(&mut self) {
        for slot in 0..self.layers.len() {
            let Some((anchor, size)) = self.layers[slot].as_ref().map(|l| (l.anchor, l.size)) else {
                continue;
            };
            let position = self.compute(anchor, size);
            if let Some(layer) = self.layers[slot].as_mut() {
                layer.position = position;
            }
        }
        tracing::trace!(mounted = self.len(), "overlay repositioned");
    }
}

/// Owns one mounted layer; unmounts it on drop.
///
/// Holds the root weakly, so an overlay dropped with the page does not outlive
/// it through stray handles.
pub struct LayerHandle {
    overlay: Weak<RefCell<OverlayRoot>>,
    pending_unmount: Rc<RefCell<Vec<LayerId>>>,
    id: LayerId,
}

impl fmt::Debug for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl LayerHandle {
    /// Mount a layer on `overlay` and own it.
    pub fn mount(overlay: &SharedOverlay, anchor: Rect, size: Size) -> Self {
        let mut root = overlay.borrow_mut();
        let id = root.mount(anchor, size);
        Self {
            overlay: Rc::downgrade(overlay),
            pending_unmount: root.pending_unmount.clone(),
            id,
        }
    }

    /// The owned layer.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Current position, or `None` if the overlay is gone.
    pub fn position(&self) -> Option<Position> {
        self.overlay.upgrade()?.borrow().position(self.id)
    }

    /// Current panel rectangle, or `None` if the overlay is gone.
    pub fn panel_rect(&self) -> Option<Rect> {
        self.overlay.upgrade()?.borrow().panel_rect(self.id)
    }

    /// Move the anchor.
    pub fn set_anchor(&self, anchor: Rect) {
        if let Some(overlay) = self.overlay.upgrade() {
            overlay.borrow_mut().set_anchor(self.id, anchor);
        }
    }

    /// Resize the panel.
    pub fn set_size(&self, size: Size) {
        if let Some(overlay) = self.overlay.upgrade() {
            overlay.borrow_mut().set_size(self.id, size);
        }
    }
}

impl Drop for LayerHandle {
    fn drop(&mut self) {
        let Some(overlay) = self.overlay.upgrade() else {
            return;
        };
        if let Ok(mut root) = overlay.try_borrow_mut() {
            root.unmount(self.id);
        } else {
            tracing::warn!(id = ?self.id, "overlay busy; layer unmount deferred");
            self.pending_unmount.borrow_mut().push(self.id);
        }
    }
}
