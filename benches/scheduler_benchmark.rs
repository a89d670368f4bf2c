//! Scheduler benchmark suite.
//!
//! Covers the queue primitives and the public submission paths:
//! - SubmissionQueue / LocalQueue push+pop cycles
//! - fire-and-forget `enqueue` throughput
//! - `spawn(..).get()` round-trip latency
//! - `then`-chain resolution

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use spindle::runtime::queue::{LocalQueue, SubmissionQueue};
use spindle::{spawn, PoolConfig, Task};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static RUNTIME: Once = Once::new();

/// Benches share one process-wide runtime; it is never finalized.
fn ensure_runtime() {
    RUNTIME.call_once(|| {
        assert!(spindle::initialize_runtime(
            PoolConfig::new().worker_threads(4).queue_capacity(1024)
        ));
    });
}

fn noop_task() -> Task {
    Task::new(|| {})
}

fn bench_queues(c: &mut Criterion) {
    let mut group = c.benchmark_group("queues");
    group.throughput(Throughput::Elements(1));

    group.bench_function("submission_push_pop", |b| {
        let queue = SubmissionQueue::new(1024);
        b.iter(|| {
            queue.push(noop_task()).expect("ring has room");
            black_box(queue.pop()).expect("just pushed");
        });
    });

    group.bench_function("local_push_pop", |b| {
        let queue = LocalQueue::new();
        b.iter(|| {
            queue.push(noop_task());
            black_box(queue.pop()).expect("just pushed");
        });
    });

    group.bench_function("local_push_steal", |b| {
        let queue = LocalQueue::new();
        let stealer = queue.stealer();
        b.iter(|| {
            queue.push(noop_task());
            black_box(stealer.steal()).expect("just pushed");
        });
    });

    group.finish();
}

fn bench_enqueue_throughput(c: &mut Criterion) {
    ensure_runtime();
    let mut group = c.benchmark_group("submission");
    let batch = 1000_u64;
    group.throughput(Throughput::Elements(batch));

    group.bench_function("enqueue_fire_and_forget", |b| {
        let invoked = Arc::new(AtomicUsize::new(0));
        b.iter(|| {
            let start = invoked.load(Ordering::Relaxed);
            for _ in 0..batch {
                let counter = Arc::clone(&invoked);
                spindle::enqueue(Task::new(move || {
                    counter.fetch_add(1, Ordering::Relaxed);
                }));
            }
            // Wait for the batch to drain so queues do not grow unboundedly.
            while (invoked.load(Ordering::Relaxed) - start) < batch as usize {
                std::hint::spin_loop();
            }
        });
    });

    group.finish();
}

fn bench_spawn(c: &mut Criterion) {
    ensure_runtime();
    let mut group = c.benchmark_group("spawn");

    group.bench_function("spawn_get_round_trip", |b| {
        b.iter(|| black_box(spawn(|| 23).get()));
    });

    group.bench_function("then_chain_100", |b| {
        b.iter(|| {
            let mut future = spawn(|| 0_u64);
            for _ in 0..100 {
                future = future.then(|n| n + 1);
            }
            assert_eq!(black_box(future.get()), 100);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_queues, bench_enqueue_throughput, bench_spawn);
criterion_main!(benches);
