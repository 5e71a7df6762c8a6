//! Benchmark for noise and PRNG throughput.
//!
//! Run with: cargo bench --package tessera_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tessera_procedural::{fbm, simplex2d, Xoshiro128};

fn benchmark_single_sample(c: &mut Criterion) {
    c.bench_function("single_simplex_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(simplex2d(black_box(x), black_box(x * 0.7)))
        });
    });
}

fn benchmark_fbm(c: &mut Criterion) {
    c.bench_function("fbm_4_octaves", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.1;
            black_box(fbm(black_box(x), black_box(x * 0.7), 4, 0.08, 2.0, 0.5, 42))
        });
    });
}

fn benchmark_zone_sized_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("zone_field");
    group.throughput(Throughput::Elements(128 * 128));

    group.bench_function("128x128_fbm", |b| {
        b.iter(|| {
            for y in 0..128 {
                for x in 0..128 {
                    black_box(fbm(f64::from(x), f64::from(y), 4, 0.08, 2.0, 0.5, 42));
                }
            }
        });
    });

    group.finish();
}

fn benchmark_prng(c: &mut Criterion) {
    let mut rng = Xoshiro128::seed(42);

    let mut group = c.benchmark_group("prng");
    group.throughput(Throughput::Elements(1));
    group.bench_function("next", |b| b.iter(|| black_box(rng.next())));
    group.bench_function("range", |b| b.iter(|| black_box(rng.range(0, 99))));
    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_sample,
    benchmark_fbm,
    benchmark_zone_sized_field,
    benchmark_prng
);
criterion_main!(benches);
