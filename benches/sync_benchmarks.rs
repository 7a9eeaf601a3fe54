use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use proctree_sync::testing::*;
use proctree_sync::{build_tree, ReparentPolicy, TableStore, TableSynchronizer, TreeStore, TreeSynchronizer};

const SIZES: [u32; 3] = [100, 1000, 5000];

fn bench_build_and_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("hierarchy");

    for size in SIZES.iter() {
        let records = create_wide_snapshot(*size);

        group.bench_with_input(BenchmarkId::new("build_tree", size), size, |b, _| {
            b.iter(|| build_tree(&records).len())
        });

        group.bench_with_input(BenchmarkId::new("build_and_flatten", size), size, |b, _| {
            b.iter(|| build_tree(&records).flatten().len())
        });
    }

    group.finish();
}

fn bench_tree_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_sync");

    for size in SIZES.iter() {
        let records = create_wide_snapshot(*size);
        let entries = build_tree(&records).flatten();
        let shifted = build_tree(&with_cpu_shift(&records, 0.5)).flatten();

        group.bench_with_input(BenchmarkId::new("initial", size), size, |b, _| {
            b.iter_batched(
                || (TreeSynchronizer::new(ReparentPolicy::Move), TreeStore::new()),
                |(mut sync, mut store)| sync.sync(&entries, &mut store),
                BatchSize::SmallInput,
            )
        });

        let mut sync = TreeSynchronizer::new(ReparentPolicy::Move);
        let mut store = TreeStore::new();
        sync.sync(&entries, &mut store);
        group.bench_with_input(BenchmarkId::new("unchanged", size), size, |b, _| {
            b.iter(|| sync.sync(&entries, &mut store))
        });

        group.bench_with_input(BenchmarkId::new("metrics_changed", size), size, |b, _| {
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                let next = if flip { &shifted } else { &entries };
                let report = sync.sync(next, &mut store);
                store.drain_events();
                report
            })
        });

        // Half the processes replaced every poll
        let half = build_tree(&records[..records.len() / 2]).flatten();
        group.bench_with_input(BenchmarkId::new("churn", size), size, |b, _| {
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                let next = if flip { &half } else { &entries };
                let report = sync.sync(next, &mut store);
                store.drain_events();
                report
            })
        });
    }

    group.finish();
}

fn bench_table_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_sync");

    for size in SIZES.iter() {
        let records = create_wide_snapshot(*size);
        let shifted = with_cpu_shift(&records, 0.5);

        group.bench_with_input(BenchmarkId::new("initial", size), size, |b, _| {
            b.iter_batched(
                || (TableSynchronizer::new(), TableStore::new()),
                |(mut sync, mut store)| sync.sync(&records, &mut store),
                BatchSize::SmallInput,
            )
        });

        let mut sync = TableSynchronizer::new();
        let mut store = TableStore::new();
        sync.sync(&records, &mut store);
        group.bench_with_input(BenchmarkId::new("metrics_changed", size), size, |b, _| {
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                let next = if flip { &shifted } else { &records };
                let report = sync.sync(next, &mut store);
                store.drain_events();
                report
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_and_flatten, bench_tree_sync, bench_table_sync);
criterion_main!(benches);
