use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use parsum::parallel::{ExecutionStrategy, detected_concurrency, split};
use parsum::sum::range_sum;
use std::hint::black_box;
use std::time::Duration;

const TOTAL: u64 = 10_000_000;

/// Compare strategies on the same workload and degree
fn bench_strategies(c: &mut Criterion) {
    let workers = detected_concurrency();
    let ranges = split(TOTAL, workers).expect("at least one worker is always detected");

    let mut group = c.benchmark_group("range_sum_strategies");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    for strategy in [
        ExecutionStrategy::Sequential,
        ExecutionStrategy::Threads,
        ExecutionStrategy::Pool,
    ] {
        group.bench_with_input(
            BenchmarkId::new(strategy.to_string(), workers),
            &ranges,
            |b, ranges| {
                b.iter(|| {
                    strategy
                        .run(black_box(ranges), range_sum, None::<fn(usize, usize, usize)>)
                        .expect("sum fits in u64")
                })
            },
        );
    }

    group.finish();
}

/// Scaling of the threaded executor with the number of workers
fn bench_degree_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_sum_degree");
    group.sample_size(20);

    for workers in [1usize, 2, 4, 8, 16] {
        let ranges = split(TOTAL, workers).expect("workers is non-zero");
        group.bench_with_input(BenchmarkId::from_parameter(workers), &ranges, |b, ranges| {
            b.iter(|| {
                ExecutionStrategy::Threads
                    .run(black_box(ranges), range_sum, None::<fn(usize, usize, usize)>)
                    .expect("sum fits in u64")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_strategies, bench_degree_scaling);
criterion_main!(benches);
