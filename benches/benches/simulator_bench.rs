//! # Simulator Benchmarks
//!
//! Measures the cost of a simulation tick and of log/CSV operations.
//! A tick is a dozen noise draws plus clamps, so it should stay well under
//! a microsecond; CSV export is linear in the retained log.
//!
//! Run: `cargo bench --bench simulator_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use odorly_core::rng::EntropySource;
use odorly_core::{natural_odor, OdorSimulator};

/// Benchmark a single simulation tick
fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulator_advance");

    group.bench_function("single_tick", |b| {
        let mut sim = OdorSimulator::new(EntropySource::seeded(42));
        b.iter(|| black_box(sim.advance()))
    });

    group.bench_function("tick_with_full_log", |b| {
        let mut sim = OdorSimulator::new(EntropySource::seeded(42));
        for _ in 0..1000 {
            sim.advance();
        }
        b.iter(|| black_box(sim.advance()))
    });

    group.finish();
}

/// Benchmark the derived odor signal
fn bench_natural_odor(c: &mut Criterion) {
    c.bench_function("natural_odor", |b| {
        b.iter(|| black_box(natural_odor(black_box(87.3))))
    });
}

/// Benchmark CSV export at different log sizes
fn bench_csv_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_export");

    for size in [10usize, 100, 1000] {
        let mut sim = OdorSimulator::new(EntropySource::seeded(42));
        for _ in 0..size {
            sim.advance();
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), &sim, |b, sim| {
            b.iter(|| black_box(sim.log().to_csv()))
        });
    }

    group.finish();
}

/// Benchmark manual actions
fn bench_actions(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulator_actions");

    group.bench_function("spritz_test", |b| {
        let mut sim = OdorSimulator::new(EntropySource::seeded(42));
        b.iter(|| sim.spritz_test())
    });

    group.bench_function("adjust_probability", |b| {
        let mut sim = OdorSimulator::new(EntropySource::seeded(42));
        b.iter(|| sim.adjust_probability(black_box(0.1)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_advance,
    bench_natural_odor,
    bench_csv_export,
    bench_actions
);
criterion_main!(benches);
