use std::{
    sync::{Arc, Barrier},
    thread,
};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{rngs::StdRng, Rng, SeedableRng};
use skipset::SkipSet;

fn make_values(
    n: usize,
    seed: u64,
) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen()).collect()
}

fn run_threads(
    set: &Arc<SkipSet<i64>>,
    num_threads: usize,
    ops_per_thread: usize,
    remove_every: Option<usize>,
) {
    let barrier = Arc::new(Barrier::new(num_threads));
    let mut handles = vec![];

    for tid in 0..num_threads {
        let set = Arc::clone(set);
        let barrier = Arc::clone(&barrier);
        let values = make_values(ops_per_thread, (tid as u64) * 42);

        handles.push(thread::spawn(move || {
            barrier.wait();
            for (i, v) in values.iter().enumerate() {
                set.insert(*v);
                if remove_every.is_some_and(|n| i % n == 0) {
                    set.remove(v);
                }
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }
}

fn bench_concurrent_inserts(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_inserts");

    for &num_threads in &[1, 2, 4, 8] {
        for &ops_per_thread in &[1000, 10_000] {
            group.throughput(Throughput::Elements((num_threads * ops_per_thread) as u64));
            group.bench_with_input(
                BenchmarkId::new("skipset", format!("{num_threads}t_{ops_per_thread}ops")),
                &(num_threads, ops_per_thread),
                |b, &(num_threads, ops_per_thread)| {
                    b.iter(|| {
                        let set = Arc::new(SkipSet::default());
                        run_threads(&set, num_threads, ops_per_thread, None);
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_concurrent_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_mixed");

    for &num_threads in &[2, 4, 8] {
        let ops_per_thread = 5_000;
        group.throughput(Throughput::Elements((num_threads * ops_per_thread) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{num_threads}t")),
            &num_threads,
            |b, &num_threads| {
                b.iter(|| {
                    let set = Arc::new(SkipSet::default());
                    run_threads(&set, num_threads, ops_per_thread, Some(4));
                })
            },
        );
    }
    group.finish();
}

fn bench_reads_under_writes(c: &mut Criterion) {
    let mut group = c.benchmark_group("reads_under_writes");
    let base: Vec<i64> = make_values(20_000, 1);

    group.bench_function("contains_and_index", |b| {
        b.iter(|| {
            let set: Arc<SkipSet<i64>> = Arc::new(base.iter().copied().collect());
            let writer = {
                let set = Arc::clone(&set);
                thread::spawn(move || run_threads(&set, 2, 2_000, Some(2)))
            };

            for (i, v) in base.iter().enumerate().take(5_000) {
                set.contains(v);
                let _ = set.index(i);
            }

            writer.join().unwrap();
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_concurrent_inserts,
    bench_concurrent_mixed,
    bench_reads_under_writes
);
criterion_main!(benches);
