//! Benchmarks for the label index
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use label_index::{Fingerprint, InvertedIndex, LabelPair, MatchType, Matcher, ShardAnnotation};

fn create_series(count: u64) -> Vec<(Vec<LabelPair>, Fingerprint)> {
    (0..count)
        .map(|i| {
            let labels = vec![
                LabelPair::new("__name__", format!("metric_{}", i % 20)),
                LabelPair::new("instance", format!("host-{}", i % 500)),
                LabelPair::new("method", ["GET", "POST", "PUT", "DELETE"][(i % 4) as usize]),
                LabelPair::new("id", i.to_string()),
            ];
            (labels, Fingerprint(i))
        })
        .collect()
}

fn populated(count: u64) -> InvertedIndex {
    let index = InvertedIndex::new();
    for (labels, fp) in create_series(count) {
        index.add(&labels, fp);
    }
    index
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");

    for size in [1_000u64, 10_000] {
        let series = create_series(size);
        group.throughput(Throughput::Elements(size));

        group.bench_function(format!("add_{}", size), |b| {
            b.iter(|| {
                let index = InvertedIndex::new();
                for (labels, fp) in &series {
                    index.add(black_box(labels), *fp);
                }
                index
            })
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let index = populated(50_000);

    let equal = [
        Matcher::equal("__name__", "metric_3"),
        Matcher::equal("method", "PUT"),
    ];
    group.bench_function("equal", |b| {
        b.iter(|| index.lookup(black_box(&equal), None).unwrap())
    });

    let set = [Matcher::new(MatchType::Regexp, "method", "GET|POST").unwrap()];
    group.bench_function("literal_alternation", |b| {
        b.iter(|| index.lookup(black_box(&set), None).unwrap())
    });

    let scan = [Matcher::new(MatchType::Regexp, "instance", "host-1.*").unwrap()];
    group.bench_function("regex_scan", |b| {
        b.iter(|| index.lookup(black_box(&scan), None).unwrap())
    });

    group.bench_function("equal_query_shard", |b| {
        b.iter(|| {
            index
                .lookup(black_box(&equal), Some(ShardAnnotation::new(1, 4)))
                .unwrap()
        })
    });

    group.finish();
}

fn bench_label_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_values");
    let index = populated(50_000);

    group.bench_function("instance", |b| {
        b.iter(|| index.label_values(black_box("instance"), None).unwrap())
    });
    group.bench_function("names", |b| b.iter(|| index.label_names(None).unwrap()));

    group.finish();
}

criterion_group!(benches, bench_add, bench_lookup, bench_label_values);
criterion_main!(benches);
