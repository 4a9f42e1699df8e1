//! Basic usage examples for WorkPool

use esox_workpool::{PoolConfiguration, PoolError, WorkPool};

fn main() {
    println!("=== EsoxSolutions.WorkPool - Basic Examples ===\n");

    // Example 1: Simple push and pop
    simple_pool();

    // Example 2: Pool with configuration
    configured_pool();

    // Example 3: Try methods
    try_methods();

    // Example 4: Termination and draining
    termination();

    // Example 5: Metrics and health
    metrics_and_health();
}

fn simple_pool() {
    println!("1. Simple Pool:");
    let pool = WorkPool::bounded(10);

    pool.push("first");
    pool.push("second");

    println!("   Queued: {}", pool.len());
    println!("   Popped: {}", pool.pop().unwrap());
    println!("   Popped: {}\n", pool.pop().unwrap());
}

fn configured_pool() {
    println!("2. Configured Pool:");

    let config = PoolConfiguration::new().unbounded();
    let pool = WorkPool::new(config);

    // An unbounded pool never blocks a producer
    for i in 0..1000 {
        pool.push(i);
    }

    println!("   Queued after 1000 pushes: {}\n", pool.len());
}

fn try_methods() {
    println!("3. Try Methods:");
    let pool = WorkPool::bounded(1);

    pool.try_push(42).unwrap();
    println!("   First try_push: Success");

    // Buffer is full; the rejected item comes back
    match pool.try_push(43) {
        Ok(()) => println!("   Second try_push: Success"),
        Err(rejected) => println!("   Second try_push: rejected {}", rejected.into_inner()),
    }

    println!("   try_pop: {:?}", pool.try_pop());
    println!("   try_pop on empty: {:?}\n", pool.try_pop());
}

fn termination() {
    println!("4. Termination and Draining:");
    let pool = WorkPool::bounded(10);
    pool.register_terminator();
    pool.start();

    pool.push(1);
    pool.push(2);
    pool.terminate();

    // Items queued before the vote still drain
    loop {
        match pool.pop() {
            Ok(item) => println!("   Drained: {item}"),
            Err(PoolError::Terminated) => {
                println!("   Pool terminated - consumer loop exits\n");
                break;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
}

fn metrics_and_health() {
    println!("5. Metrics and Health:");
    let pool = WorkPool::bounded(5);

    pool.push(1);
    pool.push(2);
    let _ = pool.pop();

    let health = pool.health_status();
    println!("   Health: {}", if health.is_healthy() { "Healthy" } else { "Unhealthy" });
    println!("   Utilization: {:.1}%", health.utilization * 100.0);

    let metrics = pool.export_metrics();
    println!("\n   Metrics:");
    for (key, value) in metrics {
        println!("     {}: {}", key, value);
    }
}
