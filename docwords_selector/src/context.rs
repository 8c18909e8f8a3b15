// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page-wide keyword context shared by every widget.

use std::rc::Rc;

use kurbo::Rect;

use crate::config::Config;
use crate::dictionary::Dictionary;
use crate::overlay::{OverlayRoot, SharedOverlay};
use crate::placement::PopperPositioner;
use crate::selection::SelectionStore;

/// Dictionary, selection store, overlay root, and configuration for one page.
///
/// Cloning is cheap and yields handles to the same shared state. Widgets
/// receive the context on every call and render nothing when it is absent.
#[derive(Clone, Debug)]
pub struct KeywordContext {
    dictionary: Rc<Dictionary>,
    store: SelectionStore,
    overlay: SharedOverlay,
    config: Rc<Config>,
}

impl KeywordContext {
    /// A context with a fresh store, an empty overlay, and default config.
    pub fn new(dictionary: Dictionary) -> Self {
        let config = Config::default();
        let overlay =
            OverlayRoot::with_positioner(Rect::ZERO, config.position, PopperPositioner).shared();
        Self {
            dictionary: Rc::new(dictionary),
            store: SelectionStore::new(),
            overlay,
            config: Rc::new(config),
        }
    }

    /// Builder: share an existing selection store.
    pub fn with_store(mut self, store: SelectionStore) -> Self {
        self.store = store;
        self
    }

    /// Builder: share an existing overlay root.
    pub fn with_overlay(mut self, overlay: SharedOverlay) -> Self {
        self.overlay = overlay;
        self
    }

    /// Builder: replace the configuration and apply its placement options.
    pub fn with_config(mut self, config: Config) -> Self {
        self.overlay.borrow_mut().set_options(config.position);
        self.config = Rc::new(config);
        self
    }

    /// Builder: set the overlay's viewport.
    pub fn with_viewport(self, viewport: Rect) -> Self {
        self.overlay.borrow_mut().set_viewport(viewport);
        self
    }

    /// The page's dictionary.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// The page's selection store.
    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// The page's overlay root.
    pub fn overlay(&self) -> &SharedOverlay {
        &self.overlay
    }

    /// The page's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}
