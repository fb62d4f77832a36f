use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use skipset::SkipSet;

fn make_sample_values(
    n: usize,
    seed: u64,
) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(i64::MIN..=i64::MAX)).collect()
}

fn filled(values: &[i64]) -> SkipSet<i64> {
    let set = SkipSet::default();
    for v in values {
        set.insert(*v);
    }
    set
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("skipset_insert");
    for &n in &[1_000usize, 10_000, 50_000] {
        let values = make_sample_values(n, 42);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &_n| {
            b.iter(|| {
                // Каждый прогон новое множество
                black_box(filled(&values));
            })
        });
    }
    group.finish();
}

fn bench_contains_hit_miss(c: &mut Criterion) {
    let mut group = c.benchmark_group("skipset_contains");
    for &n in &[1_000usize, 10_000, 50_000] {
        let hits = make_sample_values(n, 123);
        let misses = make_sample_values(n, 9999);
        let set = filled(&hits);

        group.bench_with_input(BenchmarkId::new("hit", n), &n, |b, &_n| {
            b.iter(|| {
                for v in hits.iter().take(1000) {
                    black_box(set.contains(v));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("miss", n), &n, |b, &_n| {
            b.iter(|| {
                for v in misses.iter().take(1000) {
                    black_box(set.contains(v));
                }
            })
        });
    }
    group.finish();
}

fn bench_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("skipset_index");
    for &n in &[1_000usize, 10_000, 50_000] {
        let set = filled(&make_sample_values(n, 7));
        let len = set.len();

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &_n| {
            b.iter(|| {
                for i in (0..len).step_by((len / 1000).max(1)) {
                    black_box(set.index(i).ok());
                }
            })
        });
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("skipset_remove");
    for &n in &[1_000usize, 10_000] {
        let values = make_sample_values(n, 77);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &_n| {
            b.iter_batched(
                || filled(&values),
                |set| {
                    for v in &values {
                        black_box(set.remove(v));
                    }
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_top_n(c: &mut Criterion) {
    let mut group = c.benchmark_group("skipset_top_n");
    let set = filled(&make_sample_values(50_000, 5));

    for &k in &[10usize, 100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter(|| black_box(set.top_n(k)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_contains_hit_miss,
    bench_index,
    bench_remove,
    bench_top_n
);
criterion_main!(benches);
