//! Benchmarks for sorting a queue and merging a group of queues.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use cyclic_queue::{Queue, QueueGroup};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::iter::FromIterator;

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn random_texts(len: usize, seed: u64) -> Vec<String> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..len)
        .map(|_| format!("{:08}", rng.random_range(0..len as u64 * 4)))
        .collect()
}

fn queue_of(texts: &[String]) -> Queue {
    Queue::from_iter(texts.iter().map(String::as_str))
}

// ============================================================================
// Sort
// ============================================================================

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort");

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        let random = random_texts(size, 42);
        let mut sorted = random.clone();
        sorted.sort();

        group.bench_with_input(BenchmarkId::new("random", size), &random, |b, texts| {
            b.iter_batched(
                || queue_of(texts),
                |mut queue| {
                    queue.sort(false);
                    black_box(queue)
                },
                BatchSize::LargeInput,
            );
        });

        // A sorted queue only needs one comparison per merge.
        group.bench_with_input(BenchmarkId::new("presorted", size), &sorted, |b, texts| {
            b.iter_batched(
                || queue_of(texts),
                |mut queue| {
                    queue.sort(false);
                    black_box(queue)
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("descend", size), &random, |b, texts| {
            b.iter_batched(
                || queue_of(texts),
                |mut queue| {
                    queue.sort(true);
                    black_box(queue)
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// Merge
// ============================================================================

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    let queues = 8;

    for size in SIZES {
        group.throughput(Throughput::Elements(size as u64));
        let parts: Vec<Vec<String>> = (0..queues)
            .map(|i| random_texts(size / queues, i as u64))
            .collect();

        group.bench_with_input(BenchmarkId::new("eight_queues", size), &parts, |b, parts| {
            b.iter_batched(
                || {
                    let mut chain = QueueGroup::new();
                    for part in parts {
                        chain.push(queue_of(part));
                    }
                    chain
                },
                |mut chain| black_box(chain.merge(false)),
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sort, bench_merge);
criterion_main!(benches);
