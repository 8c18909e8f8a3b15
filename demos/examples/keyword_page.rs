// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyword page.
//!
//! Scans a snippet, rewrites a small page, mounts one selector per marker,
//! and shows how choosing a project in one selector changes every keyword.
//!
//! Run:
//! - `cargo run -p docwords_demos --example keyword_page`
//! - `RUST_LOG=debug cargo run -p docwords_demos --example keyword_page`

use docwords_scanner::{Segment, scan};
use docwords_selector::adapters::tree::WidgetSet;
use docwords_selector::{Choice, Dictionary, KeywordContext, Result};
use docwords_tree::{ContentNode, Element, rewrite, widgets};
use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;

const DICTIONARY: &str = r#"{
    "PROJECT": [
        {
            "title": "web-frontend", "NAME": "web-frontend", "ORG_SLUG": "acme",
            "DSN": "https://1f2e@o11.ingest.example/101", "PROJECT_ID": 101
        },
        {
            "title": "payments-api", "NAME": "payments-api", "ORG_SLUG": "acme",
            "DSN": "https://9c3b@o11.ingest.example/202", "PROJECT_ID": 202
        }
    ]
}"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    println!("== Scan ==");
    for segment in scan("dsn: ___PROJECT.DSN______PROJECT_ID___") {
        match segment {
            Segment::Literal(text) => println!("  literal {text:?}"),
            Segment::Marker(m) => println!("  marker  {}.{} at {:?}", m.group(), m.field, m.span),
        }
    }

    let dict = Dictionary::from_json(DICTIONARY)?.with_group("USER", vec![Choice::new("me")]);
    let ctx = KeywordContext::new(dict).with_viewport(Rect::new(0.0, 0.0, 1280.0, 800.0));

    let page = [
        ContentNode::text("Configure the SDK for ___PROJECT.NAME___:"),
        Element::new("pre")
            .with_attr("class", "language-python")
            .with_child("sentry_sdk.init(dsn=\"___PROJECT.DSN___\")")
            .into(),
    ];
    let nodes = rewrite(&page);
    let mut set = WidgetSet::new();
    let counts = set.reconcile(&nodes);
    println!("\n== Mounted {} widgets ==", counts.mounted);
    for slot in widgets(&nodes) {
        println!("  {} -> {}", slot.key, slot.source);
    }

    println!("\n== Before ==\n{}", set.render_text(&nodes, Some(&ctx)));

    let keys: Vec<_> = set.keys().cloned().collect();
    let Some(title) = set.keyword_mut(&keys[0]) else {
        return Ok(());
    };
    title.set_anchor(Rect::new(180.0, 40.0, 300.0, 60.0));
    title.activate(&ctx);
    if let Some(panel) = title.render(Some(&ctx)).as_ref().and_then(|v| v.panel()) {
        println!("\n== Panel ==");
        for item in &panel.items {
            let mark = if item.active { '*' } else { ' ' };
            println!("  {mark} {}", item.label);
        }
        if let Some(position) = panel.position {
            println!("  at {:?} ({:?})", position.origin, position.side);
        }
    }
    title.choose(&ctx, 1);

    println!("\n== After ==\n{}", set.render_text(&nodes, Some(&ctx)));

    // An outside press on a freshly opened panel dismisses it.
    if let Some(dsn) = set.keyword_mut(&keys[1]) {
        dsn.set_anchor(Rect::new(120.0, 90.0, 520.0, 110.0));
        dsn.activate(&ctx);
        let closed = dsn.pointer_down(Point::new(1000.0, 700.0));
        println!("\noutside press closed the panel: {closed}");
    }
    println!("overlay layers left: {}", ctx.overlay().borrow().len());
    Ok(())
}
