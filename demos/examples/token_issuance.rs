// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Token issuance.
//!
//! Drives the org auth token creator on a single-threaded runtime with a fake
//! issuer: pick an organization, wait for the token, and watch the project
//! selection follow the organization. A second creator is dropped while its
//! request is in flight to show the result being discarded.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p docwords_demos --example token_issuance`

use std::time::Duration;

use async_trait::async_trait;
use docwords_selector::adapters::tree::WidgetSet;
use docwords_selector::{Activation, Choice, Dictionary, IssueRequest, KeywordContext, TokenIssuer};
use docwords_tree::{ContentNode, rewrite};
use tracing_subscriber::EnvFilter;

struct SlowIssuer;

#[async_trait(?Send)]
impl TokenIssuer for SlowIssuer {
    async fn issue(&self, request: IssueRequest) -> Option<String> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        (request.org_slug != "broken").then(|| format!("sntrys_{}_demo", request.org_slug))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start runtime: {err}");
            return;
        }
    };
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, run());
}

async fn run() {
    let dict = Dictionary::new()
        .with_group(
            "PROJECT",
            vec![
                Choice::new("web").with_org("acme"),
                Choice::new("ingest").with_org("globex"),
            ],
        )
        .with_group("USER", vec![Choice::new("me")]);
    let ctx = KeywordContext::new(dict);

    let nodes = rewrite(&[ContentNode::text("export AUTH_TOKEN=___ORG_AUTH_TOKEN___")]);
    let mut set = WidgetSet::new();
    set.reconcile(&nodes);
    let Some(key) = set.keys().next().cloned() else {
        return;
    };
    println!("{}", set.render_text(&nodes, Some(&ctx)));

    let Some(creator) = set.token_mut(&key) else {
        return;
    };
    if let Activation::PickerToggled { open } = creator.activate(&ctx) {
        println!("picker open: {open}");
    }
    let Some(pending) = creator.pick(&ctx, "globex") else {
        return;
    };
    tracing::info!(request = ?pending.request(), "requesting token");
    let issue = tokio::task::spawn_local(async move { pending.run(&SlowIssuer).await });
    println!("{}", set.render_text(&nodes, Some(&ctx)));

    match issue.await {
        Ok(outcome) => println!("outcome: {outcome:?}"),
        Err(err) => println!("issuance task failed: {err}"),
    }
    println!("{}", set.render_text(&nodes, Some(&ctx)));
    println!("PROJECT selection: {}", ctx.store().read("PROJECT"));

    // Unmount while pending: the late token is discarded.
    let mut other = WidgetSet::new();
    other.reconcile(&nodes);
    let Some(creator) = other.token_mut(&key) else {
        return;
    };
    creator.activate(&ctx);
    let Some(pending) = creator.pick(&ctx, "acme") else {
        return;
    };
    other.reconcile(&[]);
    let outcome = pending.run(&SlowIssuer).await;
    println!("after unmount: {outcome:?}, PROJECT still {}", ctx.store().read("PROJECT"));
}
