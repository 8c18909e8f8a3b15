// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=docwords_selector --heading-base-level=0

//! Docwords Selector: headless keyword widgets for documentation pages.
//!
//! ## Overview
//!
//! Pages rewritten by `docwords_tree` carry widget slots in place of markers.
//! This crate provides the state behind those slots:
//!
//! - [`KeywordSelector`]: shows one field of the choice currently selected for
//!   its group and lets the reader switch choices from a floating panel.
//! - [`OrgTokenCreator`]: issues an organization auth token on demand through a
//!   host-supplied [`TokenIssuer`].
//!
//! Widgets are headless. They take input events (activation, keys, pointer
//! presses, animation hooks) and produce a [`WidgetView`] for the host to draw.
//!
//! ## Shared state
//!
//! Every widget on a page receives the same [`KeywordContext`]: the immutable
//! [`Dictionary`], the [`SelectionStore`] all selectors read and write, the
//! [`OverlayRoot`] open panels mount into, and the [`Config`]. A write from one
//! selector is visible to every other selector's next render.
//!
//! ## Placement
//!
//! Open panels are layers of the overlay root, placed by a [`Positioner`]
//! ([`PopperPositioner`] by default). Layers are owned by RAII handles, so a
//! closed or dropped widget never leaves a layer behind.
//!
//! ## Errors
//!
//! Only loading inputs can fail ([`Dictionary::from_json`],
//! [`Config::from_json`]); see [`Error`]. Interaction never fails: missing
//! groups and fields render a fallback label, and invalid requests are ignored.
//!
//! ## Features
//!
//! - `tree_adapter`: `adapters::tree::WidgetSet`, which keeps one live widget
//!   per slot of a rewritten tree across re-renders.
//!
//! ## Example
//!
//! ```
//! use docwords_selector::{Choice, Dictionary, KeywordContext, KeywordSelector};
//!
//! let dict = Dictionary::new().with_group(
//!     "PROJECT",
//!     vec![Choice::new("A").with_org("org1"), Choice::new("B").with_org("org2")],
//! );
//! let ctx = KeywordContext::new(dict);
//!
//! let mut first = KeywordSelector::new("PROJECT", "title", 0);
//! let second = KeywordSelector::new("PROJECT", "ORG_SLUG", 1);
//!
//! first.activate(&ctx);
//! first.choose(&ctx, 1);
//! assert_eq!(ctx.store().read("PROJECT"), 1);
//! assert_eq!(second.render(Some(&ctx)).unwrap().text(), "org2");
//! ```

pub mod adapters;
pub mod config;
pub mod context;
pub mod dictionary;
pub mod dismiss;
mod dropdown;
pub mod error;
pub mod issuance;
pub mod overlay;
pub mod placement;
pub mod selection;
pub mod selector;
pub mod types;

pub use config::{Config, PanelMetrics};
pub use context::KeywordContext;
pub use dictionary::{Choice, Dictionary, ORG_SLUG_FIELD, PROJECT_GROUP, USER_GROUP};
pub use dismiss::{PointerRegion, classify};
pub use error::{Error, Result};
pub use issuance::{
    Activation, IssuanceState, IssueOutcome, IssueRequest, OrgTokenCreator, PendingIssue,
    TokenIssuer,
};
pub use overlay::{LayerHandle, LayerId, OverlayRoot, SharedOverlay};
pub use placement::{PopperPositioner, Position, PositionOptions, Positioner, Side};
pub use selection::{Selection, SelectionStore, Subscription};
pub use selector::KeywordSelector;
pub use types::{
    ButtonView, Indicator, Key, LabelDisplay, PanelItem, PanelView, WidgetFlags, WidgetView,
};
