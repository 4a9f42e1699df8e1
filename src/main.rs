// EsoxSolutions.WorkPool
// Thread-safe blocking work pool with cooperative termination

// This is just a binary wrapper - the actual library is in lib.rs
// Run demos with: cargo run --example basic

use esox_workpool::WorkPool;
use std::sync::Arc;
use std::thread;

fn main() {
    println!("=== EsoxSolutions.WorkPool ===");
    println!("See demos/ directory for usage examples");
    println!("Run: cargo run --example basic");
    println!();

    // Quick demo
    println!("Quick Demo:");
    let pool = Arc::new(WorkPool::bounded(8));
    pool.register_terminator();
    pool.start();

    let consumer = {
        let pool = Arc::clone(&pool);
        thread::spawn(move || {
            let mut handled = 0;
            while let Ok(job) = pool.pop() {
                println!("  popped: {job}");
                handled += 1;
            }
            handled
        })
    };

    for i in 0..5 {
        pool.push(i);
    }
    pool.terminate();

    let handled = consumer.join().unwrap();
    println!("  consumer drained {handled} items and exited cleanly");
}
