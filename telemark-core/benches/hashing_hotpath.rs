use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use std::hint::black_box;
use telemark_core::{hash_value, Context, Metric};

fn bench_payload() -> Value {
    json!({
        "dataset": {"name": "cifar10", "split": "train", "augment": true},
        "optimizer": {"name": "adamw", "lr": 3.0e-4, "betas": [0.9, 0.999]},
        "schedule": {"warmup_steps": 500, "decay": "cosine"},
        "seeds": [17, 42, 1337],
        "tags": {"owner": "ml-infra", "sweep": "lr-search-07"},
    })
}

fn bench_hash_value(c: &mut Criterion) {
    let payload = bench_payload();

    c.bench_function("hashing/nested_mapping", |b| {
        b.iter(|| black_box(hash_value(black_box(&payload))));
    });
}

fn bench_context_identity(c: &mut Criterion) {
    let payload = bench_payload();

    c.bench_function("context/construct_and_idx", |b| {
        b.iter(|| {
            let ctx = Context::new(black_box(&payload)).expect("build context");
            black_box(ctx.idx());
        });
    });

    c.bench_function("context/idx_memoized", |b| {
        let ctx = Context::new(&payload).expect("build context");
        b.iter(|| black_box(ctx.idx()));
    });
}

fn bench_metric_identity(c: &mut Criterion) {
    let context = Arc::new(Context::new(&bench_payload()).expect("build context"));

    c.bench_function("metric/selector", |b| {
        let metric = Metric::new("train/loss", Arc::clone(&context));
        b.iter(|| black_box(metric.selector()));
    });
}

criterion_group!(
    benches,
    bench_hash_value,
    bench_context_identity,
    bench_metric_identity
);
criterion_main!(benches);
