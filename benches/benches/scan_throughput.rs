// Copyright 2025 the Docwords Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use docwords_scanner::{Grammar, scan};

fn plain_text(lines: usize) -> String {
    let mut out = String::new();
    for i in 0..lines {
        out.push_str(&format!("let value_{i} = compute(input_{i}, OPTIONS);\n"));
    }
    out
}

fn keyword_text(lines: usize) -> String {
    let mut out = String::new();
    for i in 0..lines {
        match i % 4 {
            0 => out.push_str("sentry_sdk.init(dsn=\"___PROJECT.DSN___\")\n"),
            1 => out.push_str("project_id = ___PROJECT_ID______PROJECT.ORG_SLUG___\n"),
            2 => out.push_str("SENTRY_FOO___BAR___ stays literal\n"),
            _ => out.push_str(&format!("traces_sample_rate = 0.{i}\n")),
        }
    }
    out
}

fn token_text(lines: usize) -> String {
    let mut out = keyword_text(lines);
    out.push_str("export SENTRY_AUTH_TOKEN=___ORG_AUTH_TOKEN___\n");
    out
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    for &lines in &[16_usize, 256, 4096] {
        for (name, text) in [
            ("plain", plain_text(lines)),
            ("keywords", keyword_text(lines)),
            ("org_token", token_text(lines)),
        ] {
            group.throughput(Throughput::Bytes(text.len() as u64));
            group.bench_function(format!("{name}_l{lines}"), |b| {
                b.iter(|| black_box(scan(black_box(&text))).len());
            });
        }
    }
    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("grammar_select");
    let text = keyword_text(1024);
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("keywords_l1024", |b| {
        b.iter(|| Grammar::select(black_box(&text)));
    });
    group.finish();
}

criterion_group!(benches, bench_scan, bench_select);
criterion_main!(benches);
