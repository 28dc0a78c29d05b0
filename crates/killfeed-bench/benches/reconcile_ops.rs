//! Criterion benchmarks for normalization, reconciliation and the full parse.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use killfeed_bench::{bench_config, match_profile, weapon_table};
use killfeed_chunk::ChunkEvents;
use killfeed_core::CanonicalElimination;
use killfeed_engine::{normalize_property, normalize_raw, parse_eliminations, reconcile};

/// Benchmark: reconcile a 1000-elimination match from pre-normalized inputs.
fn bench_reconcile_1000(c: &mut Criterion) {
    let profile = match_profile(1000);
    let weapons = weapon_table();
    let mut stream = profile.stream();
    let raw: Vec<CanonicalElimination> =
        ChunkEvents::new(&mut stream, profile.chunks.iter(), &weapons)
            .filter_map(Result::ok)
            .filter_map(|e| e.elimination().map(normalize_raw))
            .collect();
    let property: Vec<CanonicalElimination> = profile
        .events
        .iter()
        .map(|e| normalize_property(e, &weapons))
        .collect();

    c.bench_function("reconcile_1000", |b| {
        b.iter(|| {
            let (out, stats) = reconcile(raw.clone(), property.clone());
            black_box((out.len(), stats));
        });
    });
}

/// Benchmark: full parse of a 200-elimination match.
fn bench_parse_200(c: &mut Criterion) {
    let profile = match_profile(200);

    c.bench_function("parse_eliminations_200", |b| {
        b.iter(|| {
            let mut stream = profile.stream();
            let result = parse_eliminations(
                &mut stream,
                &profile.chunks,
                profile.events.iter().cloned(),
                bench_config(),
            )
            .unwrap();
            black_box(result.eliminations.len());
        });
    });
}

criterion_group!(benches, bench_reconcile_1000, bench_parse_200);
criterion_main!(benches);
