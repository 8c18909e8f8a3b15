// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use docwords_tree::{ContentNode, Element, Rewriter, widgets};

/// A page of `sections`, each a heading, a paragraph, and a code block.
fn page(sections: usize) -> Vec<ContentNode> {
    (0..sections)
        .map(|i| {
            Element::new("section")
                .with_child(Element::new("h2").with_child(format!("Step {i}")))
                .with_child(
                    Element::new("p")
                        .with_child("Use the DSN of ___PROJECT.ORG_SLUG___ below.")
                        .with_child(Element::new("code").with_child("___PROJECT_ID___")),
                )
                .with_child(
                    Element::new("pre")
                        .with_attr("class", "language-javascript")
                        .with_child(format!(
                            "Sentry.init({{ dsn: \"___PROJECT.DSN___\", release: \"r{i}\" }});"
                        )),
                )
                .into()
        })
        .collect()
}

fn bench_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewrite");
    let rewriter = Rewriter::new();
    for &sections in &[8_usize, 128, 1024] {
        let content = page(sections);
        group.throughput(Throughput::Elements(sections as u64));
        group.bench_function(format!("page_s{sections}"), |b| {
            b.iter(|| black_box(rewriter.rewrite(black_box(&content))).len());
        });
        group.bench_function(format!("page_and_collect_s{sections}"), |b| {
            b.iter_batched(
                || rewriter.rewrite(&content),
                |nodes| widgets(&nodes).len(),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rewrite);
criterion_main!(benches);
