use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use drinks_mc::math::monte_carlo::hit_or_miss_integration;
use drinks_mc::math::quadrature::{adaptive_simpson, DEFAULT_TOLERANCE};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn f(x: f64) -> f64 {
    x.sin() + x * x
}

fn bench_hit_or_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_or_miss");
    for &n in &[1_000usize, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            b.iter(|| hit_or_miss_integration(f, 0.0, 3.0, black_box(n), &mut rng).unwrap())
        });
    }
    group.finish();
}

fn bench_reference(c: &mut Criterion) {
    c.bench_function("adaptive_simpson", |b| {
        b.iter(|| adaptive_simpson(f, black_box(0.0), black_box(3.0), DEFAULT_TOLERANCE).unwrap())
    });
}

criterion_group!(benches, bench_hit_or_miss, bench_reference);
criterion_main!(benches);
