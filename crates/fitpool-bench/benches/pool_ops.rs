//! Criterion micro-benchmarks for pool allocation, first-fit scanning, and
//! layout rendering.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fitpool_arena::Pool;
use fitpool_bench::{comb, prefill, BenchProfile};
use fitpool_test_utils::{run_churn, ChurnConfig, LiveSet};

/// Benchmark: allocate + free of one small record on an empty pool.
fn bench_alloc_free_empty(c: &mut Criterion) {
    let mut pool = Pool::create(BenchProfile::reference().capacity).unwrap();
    c.bench_function("alloc_free_empty", |b| {
        b.iter(|| {
            let h = pool.allocate(black_box(24)).unwrap();
            pool.free(h).unwrap();
        });
    });
}

/// Benchmark: allocate + free on a half-full, fragmented pool.
fn bench_alloc_free_prefilled(c: &mut Criterion) {
    let (mut pool, _live) = prefill(BenchProfile::reference(), 42);
    c.bench_function("alloc_free_prefilled", |b| {
        b.iter(|| {
            if let Ok(h) = pool.allocate(black_box(64)) {
                pool.free(h).unwrap();
            }
        });
    });
}

/// Benchmark: a request that walks `n` undersized gaps before the tail.
fn bench_first_fit_scan_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_fit_scan_depth");
    for n in [16usize, 128, 1024] {
        let mut pool = comb(n, 64);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                let h = pool.allocate(black_box(64)).unwrap();
                pool.free(h).unwrap();
            });
        });
    }
    group.finish();
}

/// Benchmark: seeded churn of 1000 operations on a fresh reference pool.
fn bench_churn_1000(c: &mut Criterion) {
    let config = ChurnConfig::new(7, 1000).with_max_size(256).unchecked();
    c.bench_function("churn_1000", |b| {
        b.iter(|| {
            let mut pool = Pool::create(BenchProfile::reference().capacity).unwrap();
            let mut live = LiveSet::new();
            black_box(run_churn(&mut pool, &config, &mut live));
        });
    });
}

/// Benchmark: layout walk and report rendering on a prefilled stress pool.
fn bench_visualize(c: &mut Criterion) {
    let (pool, _live) = prefill(BenchProfile::stress(), 42);
    c.bench_function("layout_walk", |b| {
        b.iter(|| black_box(pool.layout()));
    });
    c.bench_function("visualize", |b| {
        b.iter(|| black_box(pool.visualize()));
    });
}

criterion_group!(
    benches,
    bench_alloc_free_empty,
    bench_alloc_free_prefilled,
    bench_first_fit_scan_depth,
    bench_churn_1000,
    bench_visualize
);
criterion_main!(benches);
