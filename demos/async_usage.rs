//! Async usage examples

use esox_workpool::{PoolConfiguration, WorkPool};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    println!("=== EsoxSolutions.WorkPool - Async Examples ===\n");

    // Example 1: Async pop
    async_pop().await;

    // Example 2: Async with timeout
    async_with_timeout().await;

    // Example 3: Concurrent tasks
    concurrent_tasks().await;
}

async fn async_pop() {
    println!("1. Async Pop:");
    let pool = WorkPool::bounded(4);
    pool.push("async job");

    let job = pool.pop_async().await.unwrap();
    println!("   Got job asynchronously: {job}\n");
}

async fn async_with_timeout() {
    println!("2. Async with Timeout:");

    let config = PoolConfiguration::new()
        .with_capacity(4)
        .with_timeout(Duration::from_millis(100));

    let pool: WorkPool<i32> = WorkPool::new(config);

    // Nothing queued and nobody producing: the pop times out
    match pool.pop_async().await {
        Ok(job) => println!("   Got job: {job}"),
        Err(e) => println!("   Error: {e}\n"),
    }
}

async fn concurrent_tasks() {
    println!("3. Concurrent Tasks:");
    let pool = Arc::new(WorkPool::bounded(2));

    let producer = {
        let pool = Arc::clone(&pool);
        tokio::spawn(async move {
            for i in 0..8 {
                // Back-pressure applies to tasks too
                pool.push_async(i).await.unwrap();
            }
        })
    };

    let consumer = {
        let pool = Arc::clone(&pool);
        tokio::spawn(async move {
            for _ in 0..8 {
                let item = pool.pop_async().await.unwrap();
                println!("   task consumed {item}");
            }
        })
    };

    producer.await.unwrap();
    consumer.await.unwrap();
}
