//! # EsoxSolutions.WorkPool
//!
//! Thread-safe blocking work pool for Rust: a bounded FIFO buffer shared
//! between producer and consumer threads, with a cooperative termination
//! protocol that drains queued work before shutting consumers down.
//!
//! ## Features
//!
//! - Blocking `push`/`pop` over a capacity-limited or unbounded FIFO buffer
//! - Classic monitor synchronization (mutex plus two condition signals)
//! - Race-free shutdown: N producers each vote to terminate, consumers
//!   drain remaining items, then receive a distinct terminated condition
//! - Non-blocking `try_push`/`try_pop` variants
//! - Async adapters with timeout
//! - Single-threaded `LocalPool` variant with zero synchronization cost
//! - Metrics and health snapshots, Prometheus export
//!
//! ## Quick Start
//!
//! ```rust
//! use esox_workpool::WorkPool;
//!
//! let pool = WorkPool::bounded(100);
//! pool.register_terminator();
//! pool.start();
//!
//! pool.push("job-1");
//! pool.push("job-2");
//! pool.terminate();
//!
//! while let Ok(job) = pool.pop() {
//!     println!("working on {job}");
//! }
//! // pop returned Err(PoolError::Terminated): every item was drained
//! // and every terminator voted, so the consumer loop exits cleanly.
//! ```

mod buffer;
mod config;
mod errors;
mod health;
mod metrics;
mod pool;
mod signal;
mod termination;

pub use config::{Capacity, NotifyPolicy, PoolConfiguration};
pub use errors::{FullError, PoolError, PoolResult};
pub use health::HealthStatus;
pub use metrics::{MetricsExporter, PoolMetrics};
pub use pool::{LocalPool, WorkPool};
