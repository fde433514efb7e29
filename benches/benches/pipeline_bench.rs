//! # Feature Pipeline Benchmarks
//!
//! Measures the per-request path: composite features, one-hot reindexing
//! and scaling, plus fitting the pipeline on a training set.
//!
//! Run: `cargo bench --bench pipeline_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use career_core::prelude::*;

const CERTS: [&str; 4] = ["python", "shell programming", "full stack", "r programming"];

fn candidate(i: usize) -> Record {
    let mut record = Record::new();
    for (j, field) in SOURCE_FIELDS.iter().enumerate() {
        record.insert(*field, FieldValue::Number(50.0 + ((i * 7 + j * 3) % 45) as f64));
    }
    record.insert("Hours working per day", FieldValue::Number((4 + i % 8) as f64));
    record.insert("self-learning capability?", FieldValue::parse(if i % 2 == 0 { "yes" } else { "no" }));
    record.insert("certifications", FieldValue::Text(CERTS[i % CERTS.len()].to_string()));
    record
}

fn training_set(n: usize) -> Vec<Record> {
    (0..n).map(candidate).collect()
}

/// Benchmark the feature engineering transform alone
fn bench_engineer(c: &mut Criterion) {
    let record = candidate(3);
    c.bench_function("engineer", |b| b.iter(|| black_box(engineer(black_box(&record)))));
}

/// Benchmark one record through the full serving transform
fn bench_transform(c: &mut Criterion) {
    let (pipeline, _) = FeaturePipeline::fit(&training_set(200)).unwrap();
    let known = candidate(5);
    let mut unseen = candidate(5);
    unseen.insert("certifications", FieldValue::Text("distro making".to_string()));

    let mut group = c.benchmark_group("pipeline_transform");
    group.bench_function("known_category", |b| {
        b.iter(|| black_box(pipeline.transform(black_box(&known))))
    });
    group.bench_function("unseen_category", |b| {
        b.iter(|| black_box(pipeline.transform(black_box(&unseen))))
    });
    group.finish();
}

/// Benchmark fitting the encoder and scaler
fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_fit");
    for size in [100, 1_000, 5_000] {
        let records = training_set(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            b.iter(|| black_box(FeaturePipeline::fit(records)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_engineer, bench_transform, bench_fit);
criterion_main!(benches);
