use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fxcarry::core::QuantileMethod;
use fxcarry::math::{empirical_quantile, expanding_quantile};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, LogNormal};
use std::hint::black_box;

fn levels(n: usize) -> Vec<Option<f64>> {
    let mut rng = StdRng::seed_from_u64(2024);
    let dist = LogNormal::new(3.0, 0.3).expect("valid lognormal parameters");
    (0..n).map(|_| Some(dist.sample(&mut rng))).collect()
}

/// Re-sorts the whole prefix on every date.
fn naive_expanding(series: &[Option<f64>], q: f64) -> Vec<Option<f64>> {
    let mut seen = Vec::with_capacity(series.len());
    series
        .iter()
        .map(|x| {
            if let Some(x) = x {
                seen.push(*x);
            }
            empirical_quantile(&seen, q, QuantileMethod::Nearest)
        })
        .collect()
}

fn bench_expanding_quantile(c: &mut Criterion) {
    let mut group = c.benchmark_group("expanding_quantile");
    for n in [1_000usize, 5_000] {
        let series = levels(n);
        group.bench_with_input(BenchmarkId::new("heaps", n), &series, |b, s| {
            b.iter(|| expanding_quantile(black_box(s), 0.95, QuantileMethod::Nearest))
        });
        group.bench_with_input(BenchmarkId::new("resort", n), &series, |b, s| {
            b.iter(|| naive_expanding(black_box(s), 0.95))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_expanding_quantile);
criterion_main!(benches);
