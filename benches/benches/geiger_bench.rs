//! # Geiger Benchmarks
//!
//! Measures the pure rate math (evaluated on every click) and the shared
//! click counter under repeated recording.
//!
//! Run: `cargo bench --bench geiger_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use odorly_core::rng::EntropySource;
use odorly_geiger::{click_rate, next_interval, ClickCounter, RateConfig};

/// Benchmark the rate function across odor levels
fn bench_click_rate(c: &mut Criterion) {
    let mut group = c.benchmark_group("click_rate");
    let config = RateConfig::default();

    for pct in [0.0f64, 50.0, 100.0] {
        group.bench_with_input(BenchmarkId::from_parameter(pct), &pct, |b, &pct| {
            let mut noise = EntropySource::seeded(42);
            b.iter(|| black_box(click_rate(&config, black_box(pct), &mut noise)))
        });
    }

    group.finish();
}

/// Benchmark the exponential interval draw
fn bench_next_interval(c: &mut Criterion) {
    let config = RateConfig::default();

    c.bench_function("next_interval", |b| {
        let mut noise = EntropySource::seeded(42);
        b.iter(|| black_box(next_interval(&config, black_box(3.8), &mut noise)))
    });
}

/// Benchmark click recording and windowed statistics
fn bench_counter(c: &mut Criterion) {
    let mut group = c.benchmark_group("click_counter");

    group.bench_function("record", |b| {
        let counter = ClickCounter::new();
        b.iter(|| counter.record())
    });

    group.bench_function("cps_with_window", |b| {
        let counter = ClickCounter::new();
        for _ in 0..500 {
            counter.record();
        }
        b.iter(|| black_box(counter.cps()))
    });

    group.finish();
}

criterion_group!(benches, bench_click_rate, bench_next_interval, bench_counter);
criterion_main!(benches);
