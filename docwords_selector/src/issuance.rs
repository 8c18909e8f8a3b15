// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The organization auth token creator.
//!
//! ## States
//!
//! ```text
//! Idle --activate/pick--> Pending --token--> Issued(token)
//!                                 --none---> Failed
//! ```
//!
//! `Issued` and `Failed` are terminal; there is no retry. A viewer who is not
//! signed in only ever sees the placeholder token and the flow stays `Idle`.
//!
//! ## Async boundary
//!
//! Starting issuance is synchronous: the widget moves to `Pending` and hands
//! back a [`PendingIssue`]. The host drives [`PendingIssue::run`] on its
//! single-threaded executor. The pending issue only holds the widget's state
//! weakly, so dropping the widget while the request is in flight discards the
//! result: neither the widget nor the selection store is touched.
//!
//! ```
//! use async_trait::async_trait;
//! use docwords_selector::{
//!     Activation, Choice, Dictionary, IssueOutcome, IssueRequest, IssuanceState,
//!     KeywordContext, OrgTokenCreator, TokenIssuer,
//! };
//!
//! struct Fixed;
//!
//! #[async_trait(?Send)]
//! impl TokenIssuer for Fixed {
//!     async fn issue(&self, request: IssueRequest) -> Option<String> {
//!         Some(format!("sntrys_{}", request.org_slug))
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let dict = Dictionary::new()
//!     .with_group("PROJECT", vec![Choice::new("web").with_org("acme")])
//!     .with_group("USER", vec![Choice::new("me")]);
//! let ctx = KeywordContext::new(dict);
//! let mut creator = OrgTokenCreator::new();
//!
//! let Activation::Started(pending) = creator.activate(&ctx) else { unreachable!() };
//! assert_eq!(creator.state(), IssuanceState::Pending);
//! assert_eq!(pending.run(&Fixed).await, IssueOutcome::Issued("sntrys_acme".into()));
//! assert_eq!(creator.render(Some(&ctx)).unwrap().text(), "sntrys_acme");
//! # });
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::context::KeywordContext;
use crate::dictionary::PROJECT_GROUP;
use crate::dropdown::Dropdown;
use crate::types::{ButtonView, Key, PanelItem, PanelView, WidgetFlags, WidgetView};

/// Where a token creator is in its lifecycle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum IssuanceState {
    /// Waiting for activation.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// A token was issued.
    Issued(String),
    /// The issuer reported failure.
    Failed,
}

impl IssuanceState {
    /// Whether no further transition can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Issued(_) | Self::Failed)
    }
}

/// Payload sent to the issuer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    /// Organization the token is scoped to.
    pub org_slug: String,
    /// Human-readable token name.
    pub name: String,
}

impl IssueRequest {
    /// A request with an explicit name.
    pub fn new(org_slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            org_slug: org_slug.into(),
            name: name.into(),
        }
    }

    /// A request named `"{prefix} YYYY-MM-DD"`.
    pub fn for_org(org_slug: impl Into<String>, prefix: &str, date: NaiveDate) -> Self {
        Self::new(org_slug, format!("{prefix} {}", date.format("%Y-%m-%d")))
    }
}

/// Issues organization auth tokens. `None` signals failure.
#[async_trait(?Send)]
pub trait TokenIssuer {
    /// Issue a token for `request`.
    async fn issue(&self, request: IssueRequest) -> Option<String>;
}

/// Result of activating a token creator.
#[derive(Debug)]
pub enum Activation {
    /// The viewer is not signed in; the placeholder token stays visible.
    Placeholder,
    /// The flow is no longer idle.
    Ignored,
    /// The organization picker opened or closed.
    PickerToggled {
        /// Whether the picker is now open.
        open: bool,
    },
    /// Issuance started for the only organization.
    Started(PendingIssue),
}

/// How a [`PendingIssue`] resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IssueOutcome {
    /// The token was issued and stored on the widget.
    Issued(String),
    /// The issuer failed; the widget shows the failure message.
    Failed,
    /// The widget was dropped first; the result was thrown away.
    Discarded,
}

/// An issuance request waiting to be driven.
#[derive(Debug)]
#[must_use = "issuance only happens when the pending issue is run"]
pub struct PendingIssue {
    state: Weak<RefCell<IssuanceState>>,
    ctx: KeywordContext,
    request: IssueRequest,
}

impl PendingIssue {
    /// The request that will be sent.
    pub fn request(&self) -> &IssueRequest {
        &self.request
    }

    /// Send the request and apply the result if the widget still exists.
    ///
    /// On success the `PROJECT` selection moves to the first project of the
    /// organization, unless the current project already belongs to it.
    pub async fn run<I: TokenIssuer + ?Sized>(self, issuer: &I) -> IssueOutcome {
        let Self {
            state,
            ctx,
            request,
        } = self;
        let org = request.org_slug.clone();
        let token = issuer.issue(request).await;

        let Some(state) = state.upgrade() else {
            tracing::debug!(%org, "token creator dropped; result discarded");
            return IssueOutcome::Discarded;
        };
        match token {
            Some(token) => {
                *state.borrow_mut() = IssuanceState::Issued(token.clone());
                tracing::debug!(%org, "token issued");
                select_org(&ctx, &org);
                IssueOutcome::Issued(token)
            }
            None => {
                *state.borrow_mut() = IssuanceState::Failed;
                tracing::warn!(%org, "token issuance failed");
                IssueOutcome::Failed
            }
        }
    }
}

fn select_org(ctx: &KeywordContext, org: &str) {
    let dict = ctx.dictionary();
    let current = ctx.store().read(PROJECT_GROUP);
    if dict
        .choice(PROJECT_GROUP, current)
        .is_some_and(|c| c.belongs_to(org))
    {
        return;
    }
    if let Some(idx) = dict.first_project_of(org) {
        ctx.store().write(PROJECT_GROUP, idx);
    }
}

/// Inline widget that issues an auth token on demand.
#[derive(Debug, Default)]
pub struct OrgTokenCreator {
    state: Rc<RefCell<IssuanceState>>,
    dropdown: Dropdown,
}

impl OrgTokenCreator {
    /// A fresh, idle creator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> IssuanceState {
        self.state.borrow().clone()
    }

    /// Whether the organization picker is open.
    pub fn is_open(&self) -> bool {
        self.dropdown.is_open()
    }

    /// Current state flags.
    pub fn flags(&self) -> WidgetFlags {
        self.dropdown.flags()
    }

    /// Report the inline button's rectangle.
    pub fn set_anchor(&mut self, anchor: Rect) {
        self.dropdown.set_anchor(anchor);
    }

    /// Activate using today's UTC date for the token name.
    pub fn activate(&mut self, ctx: &KeywordContext) -> Activation {
        self.activate_on(ctx, Utc::now().date_naive())
    }

    /// Activate, naming any token after `today`.
    ///
    /// With exactly one organization issuance starts at once; otherwise the
    /// picker toggles.
    pub fn activate_on(&mut self, ctx: &KeywordContext, today: NaiveDate) -> Activation {
        let dict = ctx.dictionary();
        if !dict.is_authenticated() {
            return Activation::Placeholder;
        }
        if *self.state.borrow() != IssuanceState::Idle {
            tracing::debug!(state = ?self.state.borrow(), "activation ignored");
            return Activation::Ignored;
        }
        match dict.org_slugs().as_slice() {
            [org] => Activation::Started(self.start(ctx, org, today)),
            orgs => {
                let size = ctx.config().panel.panel_size(orgs.len(), true);
                let open = self.dropdown.toggle(ctx.overlay(), size);
                tracing::debug!(orgs = orgs.len(), open, "organization picker toggled");
                Activation::PickerToggled { open }
            }
        }
    }

    /// Handle a key press while focused.
    pub fn handle_key(&mut self, key: Key, ctx: &KeywordContext) -> Option<Activation> {
        if key.activates() {
            Some(self.activate(ctx))
        } else {
            if key == Key::Escape {
                self.dropdown.close();
            }
            None
        }
    }

    /// Pick `org` from the picker using today's UTC date.
    pub fn pick(&mut self, ctx: &KeywordContext, org: &str) -> Option<PendingIssue> {
        self.pick_on(ctx, org, Utc::now().date_naive())
    }

    /// Pick `org` from the picker, naming the token after `today`.
    ///
    /// Returns `None` for unknown organizations or when the flow is not idle.
    pub fn pick_on(
        &mut self,
        ctx: &KeywordContext,
        org: &str,
        today: NaiveDate,
    ) -> Option<PendingIssue> {
        let dict = ctx.dictionary();
        if !dict.is_authenticated() || *self.state.borrow() != IssuanceState::Idle {
            return None;
        }
        if !dict.org_slugs().contains(&org) {
            tracing::debug!(%org, "unknown organization picked");
            return None;
        }
        self.dropdown.close();
        Some(self.start(ctx, org, today))
    }

    fn start(&mut self, ctx: &KeywordContext, org: &str, today: NaiveDate) -> PendingIssue {
        self.dropdown.close();
        *self.state.borrow_mut() = IssuanceState::Pending;
        let request = IssueRequest::for_org(org, &ctx.config().token_name_prefix, today);
        tracing::debug!(%org, name = %request.name, "token issuance started");
        PendingIssue {
            state: Rc::downgrade(&self.state),
            ctx: ctx.clone(),
            request,
        }
    }

    /// Close the picker. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        self.dropdown.close()
    }

    /// A pointer went down at `point`; closes the picker on outside presses.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        self.dropdown.pointer_down(point)
    }

    /// The label animation started.
    pub fn animation_started(&mut self) {
        self.dropdown.animation_started();
    }

    /// The label animation finished.
    pub fn animation_finished(&mut self) {
        self.dropdown.animation_finished();
    }

    /// Render against `ctx`; `None` without a context.
    pub fn render(&self, ctx: Option<&KeywordContext>) -> Option<WidgetView> {
        let ctx = ctx?;
        let config = ctx.config();
        if !ctx.dictionary().is_authenticated() {
            return Some(WidgetView::Text(config.placeholder_token.clone()));
        }
        let view = match &*self.state.borrow() {
            IssuanceState::Issued(token) => WidgetView::Text(token.clone()),
            IssuanceState::Failed => WidgetView::Text(config.failure_message.clone()),
            IssuanceState::Pending => WidgetView::Text(config.pending_label.clone()),
            IssuanceState::Idle => {
                let panel = self.is_open().then(|| {
                    let orgs = ctx.dictionary().org_slugs();
                    PanelView {
                        header: Some(config.org_picker_header.clone()),
                        size: config.panel.panel_size(orgs.len(), true),
                        items: orgs
                            .into_iter()
                            .map(|org| PanelItem {
                                label: org.to_owned(),
                                active: false,
                            })
                            .collect(),
                        position: self.dropdown.position(),
                    }
                });
                WidgetView::Button(ButtonView {
                    title: config.generate_label.clone(),
                    label: config.generate_label.clone(),
                    label_key: 0,
                    indicator: None,
                    display: self.dropdown.display(),
                    panel,
                })
            }
        };
        Some(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{Choice, Dictionary, USER_GROUP};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
    }

    fn ctx(orgs: &[&str]) -> KeywordContext {
        let projects = orgs
            .iter()
            .map(|o| Choice::new(format!("{o}-web")).with_org(*o))
            .collect();
        KeywordContext::new(
            Dictionary::new()
                .with_group(PROJECT_GROUP, projects)
                .with_group(USER_GROUP, vec![Choice::new("me")]),
        )
    }

    #[test]
    fn request_name_uses_prefix_and_date() {
        let r = IssueRequest::for_org("acme", "Generated by Docs on", today());
        assert_eq!(r.name, "Generated by Docs on 2025-03-07");
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            serde_json::json!({"orgSlug": "acme", "name": "Generated by Docs on 2025-03-07"})
        );
    }

    #[test]
    fn anonymous_viewer_gets_placeholder() {
        let ctx = KeywordContext::new(
            Dictionary::new().with_group(PROJECT_GROUP, vec![Choice::new("a").with_org("o")]),
        );
        let mut c = OrgTokenCreator::new();
        assert!(matches!(c.activate_on(&ctx, today()), Activation::Placeholder));
        assert!(c.pick_on(&ctx, "o", today()).is_none());
        assert_eq!(c.state(), IssuanceState::Idle);
        assert_eq!(
            c.render(Some(&ctx)),
            Some(WidgetView::Text("sntrys_YOUR_TOKEN_HERE".into()))
        );
    }

    #[test]
    fn idle_renders_generate_button() {
        let ctx = ctx(&["a"]);
        let view = OrgTokenCreator::new().render(Some(&ctx)).unwrap();
        let b = view.as_button().unwrap();
        assert_eq!(b.label, "Click to generate token");
        assert_eq!(b.title, "Click to generate token");
        assert!(b.indicator.is_none());
        assert!(OrgTokenCreator::new().render(None).is_none());
    }

    #[test]
    fn single_org_starts_immediately() {
        let ctx = ctx(&["acme"]);
        let mut c = OrgTokenCreator::new();
        let Activation::Started(p) = c.activate_on(&ctx, today()) else {
            panic!("expected issuance to start");
        };
        assert_eq!(p.request().org_slug, "acme");
        assert_eq!(c.state(), IssuanceState::Pending);
        assert_eq!(c.render(Some(&ctx)).unwrap().text(), "Generating token...");
        assert!(matches!(c.activate_on(&ctx, today()), Activation::Ignored));
    }

    #[test]
    fn several_orgs_open_picker() {
        let ctx = ctx(&["a", "b", "a"]);
        let mut c = OrgTokenCreator::new();
        assert!(matches!(
            c.activate_on(&ctx, today()),
            Activation::PickerToggled { open: true }
        ));
        let view = c.render(Some(&ctx)).unwrap();
        let panel = view.panel().unwrap();
        assert_eq!(panel.header.as_deref(), Some("Select an organization:"));
        let labels: Vec<_> = panel.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b"]);
        assert_eq!(panel.active(), None);

        assert!(c.pick_on(&ctx, "zzz", today()).is_none());
        let p = c.pick_on(&ctx, "b", today()).unwrap();
        assert_eq!(p.request().org_slug, "b");
        assert!(!c.is_open());
        assert!(ctx.overlay().borrow().is_empty());
        assert_eq!(c.state(), IssuanceState::Pending);
    }

    #[test]
    fn zero_orgs_toggle_empty_picker() {
        let ctx = ctx(&[]);
        let mut c = OrgTokenCreator::new();
        assert!(matches!(
            c.activate_on(&ctx, today()),
            Activation::PickerToggled { open: true }
        ));
        assert!(c.render(Some(&ctx)).unwrap().panel().unwrap().items.is_empty());
        assert!(matches!(
            c.activate_on(&ctx, today()),
            Activation::PickerToggled { open: false }
        ));
    }

    #[test]
    fn escape_closes_picker() {
        let ctx = ctx(&["a", "b"]);
        let mut c = OrgTokenCreator::new();
        c.activate_on(&ctx, today());
        assert!(c.handle_key(Key::Escape, &ctx).is_none());
        assert!(!c.is_open());
    }

    #[test]
    fn terminal_states() {
        assert!(!IssuanceState::Idle.is_terminal());
        assert!(!IssuanceState::Pending.is_terminal());
        assert!(IssuanceState::Failed.is_terminal());
        assert!(IssuanceState::Issued("t".into()).is_terminal());
    }
}
