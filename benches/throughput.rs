use criterion::{Criterion, criterion_group, criterion_main};
use esox_workpool::WorkPool;
use std::hint::black_box;

fn uncontended_push_pop(c: &mut Criterion) {
    let pool = WorkPool::bounded(1024);
    c.bench_function("uncontended_push_pop", |b| {
        b.iter(|| {
            pool.push(black_box(1u64));
            pool.pop().unwrap()
        })
    });
}

fn try_push_pop(c: &mut Criterion) {
    let pool = WorkPool::bounded(1024);
    c.bench_function("try_push_pop", |b| {
        b.iter(|| {
            pool.try_push(black_box(1u64)).unwrap();
            pool.try_pop().unwrap()
        })
    });
}

fn push_batch_then_drain(c: &mut Criterion) {
    c.bench_function("push_100_drain_100", |b| {
        b.iter(|| {
            let pool = WorkPool::bounded(128);
            for i in 0..100u64 {
                pool.push(i);
            }
            let mut sum = 0u64;
            for _ in 0..100 {
                sum += pool.pop().unwrap();
            }
            black_box(sum)
        })
    });
}

criterion_group!(benches, uncontended_push_pop, try_push_pop, push_batch_then_drain);
criterion_main!(benches);
