//! CircularBuffer and BlockingDeque performance benchmark
//!
//! 对比 CircularBuffer 与 std VecDeque，以及 BlockingDeque 的多线程吞吐
//!
//! 重点测试：
//! 1. 满缓冲区上的覆盖推送
//! 2. 中间位置的插入与删除
//! 3. 阻塞队列的生产者-消费者吞吐

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::collections::VecDeque;
use std::hint::black_box;
use std::num::NonZero;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use syncring::{BlockingDeque, CircularBuffer, FullPolicy};

/// Benchmark: Overwriting push_back on a full buffer
///
/// 满缓冲区上的覆盖式 push_back
fn benchmark_overwrite_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("circular_overwrite_push");

    for capacity in [8, 64, 512] {
        let operations = 10000;
        group.throughput(Throughput::Elements(operations));

        group.bench_with_input(
            BenchmarkId::new("circular_buffer", capacity),
            &capacity,
            |b, &cap| {
                b.iter(|| {
                    let mut buf = CircularBuffer::with_capacity(cap);
                    for i in 0..operations {
                        black_box(buf.push_back(black_box(i)));
                    }
                });
            },
        );

        // VecDeque has to evict by hand
        group.bench_with_input(BenchmarkId::new("vec_deque", capacity), &capacity, |b, &cap| {
            b.iter(|| {
                let mut deque = VecDeque::with_capacity(cap);
                for i in 0..operations {
                    if deque.len() == cap {
                        black_box(deque.pop_front());
                    }
                    deque.push_back(black_box(i));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark: Insert and erase in the middle of a wrapped buffer
///
/// 在环绕的缓冲区中间插入和删除
fn benchmark_middle_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("circular_middle_edits");

    let capacity = 256;
    let setup = || {
        let mut buf = CircularBuffer::with_capacity(capacity);
        // Wrap the live range around the end of the slot block
        buf.extend(0..capacity as u64 + capacity as u64 / 2);
        buf.erase_end(capacity / 4);
        buf
    };

    group.bench_function("insert_n_middle", |b| {
        b.iter_batched(
            setup,
            |mut buf| {
                let middle = buf.len() / 2;
                buf.insert_n(middle, 16, black_box(7));
                buf
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("erase_range_near_front", |b| {
        b.iter_batched(
            setup,
            |mut buf| {
                buf.erase_range(8..24);
                buf
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("erase_range_near_back", |b| {
        b.iter_batched(
            setup,
            |mut buf| {
                let len = buf.len();
                buf.erase_range(len - 24..len - 8);
                buf
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

/// Benchmark: Multi-threaded producer-consumer
///
/// 多线程生产者-消费者性能
fn benchmark_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("deque_concurrent");
    group.measurement_time(Duration::from_secs(10));

    let messages: u64 = 10000;
    group.throughput(Throughput::Elements(messages));

    for capacity in [1, 16, 128] {
        group.bench_with_input(BenchmarkId::new("block", capacity), &capacity, |b, &cap| {
            b.iter(|| {
                let deque = Arc::new(BlockingDeque::new(NonZero::new(cap).unwrap(), FullPolicy::Block));

                let producer = {
                    let deque = Arc::clone(&deque);
                    thread::spawn(move || {
                        for i in 0..messages {
                            deque.push_back(black_box(i));
                        }
                    })
                };

                for _ in 0..messages {
                    black_box(deque.pop_front());
                }
                producer.join().unwrap();
            });
        });
    }

    group.bench_function("overwrite_four_producers", |b| {
        b.iter(|| {
            let deque = Arc::new(BlockingDeque::new(
                NonZero::new(64).unwrap(),
                FullPolicy::OverwriteOldest,
            ));

            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let deque = Arc::clone(&deque);
                    thread::spawn(move || {
                        for i in 0..messages / 4 {
                            black_box(deque.push_back(black_box(i)));
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
            black_box(deque.len());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_overwrite_push,
    benchmark_middle_edits,
    benchmark_concurrent,
);

criterion_main!(benches);
