//! Multi-threaded producer/consumer examples

use esox_workpool::{PoolError, WorkPool};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

fn main() {
    println!("=== EsoxSolutions.WorkPool - Threaded Examples ===\n");

    // Example 1: Single producer, single consumer
    handoff();

    // Example 2: Bounded buffer back-pressure
    back_pressure();

    // Example 3: Many consumers draining one producer
    fan_out();
}

fn handoff() {
    println!("1. Producer/Consumer Handoff:");
    let pool = Arc::new(WorkPool::bounded(16));

    let producer = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            for i in 0..10 {
                pool.push(i);
            }
        })
    };

    let consumer = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            for _ in 0..10 {
                let item = pool.pop().unwrap();
                println!("   consumed {item}");
            }
        })
    };

    producer.join().unwrap();
    consumer.join().unwrap();
    println!();
}

fn back_pressure() {
    println!("2. Back-pressure (capacity 2):");
    let pool = Arc::new(WorkPool::bounded(2));

    let producer = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            for i in 0..6 {
                // Blocks whenever the buffer already holds 2 items
                pool.push(i);
                println!("   produced {i}");
            }
        })
    };

    let consumer = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            for _ in 0..6 {
                thread::sleep(std::time::Duration::from_millis(20));
                let item = pool.pop().unwrap();
                println!("   consumed {item}");
            }
        })
    };

    producer.join().unwrap();
    consumer.join().unwrap();

    let metrics = pool.metrics();
    println!("   pushes that had to wait: {}\n", metrics.pool_full_events);
}

fn fan_out() {
    println!("3. Fan-out with Termination:");
    let pool = Arc::new(WorkPool::bounded(64));
    let handled = Arc::new(AtomicUsize::new(0));

    pool.register_terminator();
    pool.start();

    let consumers: Vec<_> = (0..4)
        .map(|_| {
            let pool = Arc::clone(&pool);
            let handled = Arc::clone(&handled);
            thread::spawn(move || {
                loop {
                    match pool.pop() {
                        Ok(_) => {
                            handled.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(PoolError::Terminated) => break,
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
            })
        })
        .collect();

    for i in 0..1000 {
        pool.push(i);
    }
    pool.terminate();

    for consumer in consumers {
        consumer.join().unwrap();
    }

    println!("   4 consumers handled {} items total", handled.load(Ordering::Relaxed));
}
