//! # Random Forest Benchmarks
//!
//! Measures single-vector prediction latency and training cost as the
//! number of trees grows.
//!
//! Run: `cargo bench --bench forest_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use career_core::prelude::*;

const N_FEATURES: usize = 20;
const N_CLASSES: usize = 6;

/// Deterministic class-separable data without pulling in an RNG.
fn synthetic(n: usize) -> (Vec<Vec<f64>>, Vec<usize>) {
    let mut features = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let class = i % N_CLASSES;
        let row = (0..N_FEATURES)
            .map(|j| class as f64 + ((i * 31 + j * 17) % 100) as f64 / 100.0)
            .collect();
        features.push(row);
        labels.push(class);
    }
    (features, labels)
}

fn fitted(n_estimators: usize) -> RandomForest {
    let (features, labels) = synthetic(600);
    let mut forest = RandomForest::new(ForestConfig {
        n_estimators,
        ..ForestConfig::default()
    });
    forest.fit(&features, &labels, N_CLASSES).unwrap();
    forest
}

/// Benchmark prediction for one vector
fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_predict");
    let (features, _) = synthetic(1);
    for trees in [1, 25, 100] {
        let forest = fitted(trees);
        group.bench_with_input(BenchmarkId::from_parameter(trees), &forest, |b, forest| {
            b.iter(|| black_box(forest.predict(black_box(&features[0]))))
        });
    }
    group.finish();
}

/// Benchmark training
fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("forest_fit");
    group.sample_size(10);
    let (features, labels) = synthetic(600);
    for trees in [5, 25] {
        group.bench_with_input(BenchmarkId::from_parameter(trees), &trees, |b, &trees| {
            b.iter(|| {
                let mut forest = RandomForest::new(ForestConfig {
                    n_estimators: trees,
                    ..ForestConfig::default()
                });
                forest.fit(&features, &labels, N_CLASSES).unwrap();
                black_box(forest)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_predict, bench_fit);
criterion_main!(benches);
