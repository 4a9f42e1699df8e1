//! Core work pool implementations

use crate::buffer::FifoBuffer;
use crate::config::{Capacity, PoolConfiguration};
use crate::errors::{FullError, PoolError, PoolResult};
use crate::health::HealthStatus;
use crate::metrics::{MetricsExporter, MetricsTracker, PoolMetrics};
use crate::signal::Signal;
use crate::termination::TerminationState;

use parking_lot::{Condvar, Mutex};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::time::Duration;

/// Retry interval for the polling async adapters
const ASYNC_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Everything the pool mutates under its lock. The buffer and the
/// termination countdown share one mutex so a pop can observe both
/// consistently.
struct PoolState<T> {
    buffer: FifoBuffer<T>,
    termination: TerminationState,
}

impl<T> PoolState<T> {
    fn new() -> Self {
        Self {
            buffer: FifoBuffer::new(),
            termination: TerminationState::new(),
        }
    }
}

/// Thread-safe blocking work pool with a FIFO buffer and cooperative
/// termination.
///
/// Producers `push` and block while the buffer is full; consumers `pop`
/// and block while it is empty. Shutdown is a handshake: every producer
/// registers as a terminator up front, the session is `start`ed, and each
/// producer votes with `terminate` when done. Consumers keep draining
/// queued items after the final vote and receive
/// [`PoolError::Terminated`] only once the buffer is empty.
///
/// # Examples
///
/// ```
/// use esox_workpool::{PoolError, WorkPool};
///
/// let pool = WorkPool::bounded(777);
/// pool.register_terminator();
/// pool.start();
///
/// pool.push(9);
/// pool.push(10);
/// pool.terminate();
///
/// // Queued items drain before the termination signal fires.
/// assert_eq!(pool.pop(), Ok(9));
/// assert_eq!(pool.pop(), Ok(10));
/// assert_eq!(pool.pop(), Err(PoolError::Terminated));
/// ```
pub struct WorkPool<T> {
    state: Mutex<PoolState<T>>,
    slot_free: Signal,
    item_ready: Signal,
    started: Condvar,
    capacity: Capacity,
    operation_timeout: Option<Duration>,
    metrics: MetricsTracker,
}

impl<T> WorkPool<T> {
    /// Create a new pool from a configuration
    pub fn new(config: PoolConfiguration) -> Self {
        Self {
            state: Mutex::new(PoolState::new()),
            slot_free: Signal::new(config.notify_policy),
            item_ready: Signal::new(config.notify_policy),
            started: Condvar::new(),
            capacity: config.capacity,
            operation_timeout: config.operation_timeout,
            metrics: MetricsTracker::new(),
        }
    }

    /// Pool bounded at `capacity` items, otherwise default configuration
    pub fn bounded(capacity: usize) -> Self {
        Self::new(PoolConfiguration::new().with_capacity(capacity))
    }

    /// Pool with no capacity limit; producers never block
    pub fn unbounded() -> Self {
        Self::new(PoolConfiguration::new().unbounded())
    }

    /// Append an item, blocking while the buffer is full.
    ///
    /// # Panics
    ///
    /// Panics if the pool has already fully terminated - pushing into a
    /// terminated pool is a bug in the calling code.
    pub fn push(&self, item: T) {
        {
            let mut state = self.state.lock();
            if state.termination.should_terminate() {
                panic!("push on a terminated work pool");
            }

            let mut waited = false;
            while !state.termination.should_terminate()
                && !self.capacity.has_free_slot(state.buffer.len())
            {
                if !waited {
                    waited = true;
                    self.metrics.pool_full_events.fetch_add(1, Ordering::Relaxed);
                    #[cfg(feature = "tracing")]
                    tracing::trace!(queued = state.buffer.len(), "push waiting for a free slot");
                }
                self.slot_free.wait(&mut state);
            }

            // Insert even if termination fired during the wait: dropping
            // the item here would break the drain guarantee.
            state.buffer.push_back(item);
            self.metrics.total_pushed.fetch_add(1, Ordering::Relaxed);
        }
        self.item_ready.notify();
    }

    /// Non-blocking push. A full buffer hands the item back in
    /// [`FullError`].
    ///
    /// # Panics
    ///
    /// Panics if the pool has already fully terminated, like
    /// [`WorkPool::push`].
    pub fn try_push(&self, item: T) -> Result<(), FullError<T>> {
        {
            let mut state = self.state.lock();
            if state.termination.should_terminate() {
                panic!("push on a terminated work pool");
            }
            if !self.capacity.has_free_slot(state.buffer.len()) {
                return Err(FullError(item));
            }
            state.buffer.push_back(item);
            self.metrics.total_pushed.fetch_add(1, Ordering::Relaxed);
        }
        self.item_ready.notify();
        Ok(())
    }

    /// Remove and return the oldest item, blocking while the buffer is
    /// empty and the pool is not terminating.
    ///
    /// Items queued before the final `terminate` vote are still handed
    /// out afterwards; only an empty, fully-terminated pool returns
    /// [`PoolError::Terminated`]. That error is the expected way consumer
    /// loops learn to stop.
    pub fn pop(&self) -> PoolResult<T> {
        let mut state = self.state.lock();

        let mut waited = false;
        while !state.termination.should_terminate() && state.buffer.is_empty() {
            if !waited {
                waited = true;
                self.metrics.pool_empty_events.fetch_add(1, Ordering::Relaxed);
                #[cfg(feature = "tracing")]
                tracing::trace!("pop waiting for an item");
            }
            self.item_ready.wait(&mut state);
        }

        if let Some(item) = state.buffer.pop_front() {
            self.metrics.total_popped.fetch_add(1, Ordering::Relaxed);
            let slot_freed = self.capacity.has_free_slot(state.buffer.len());
            drop(state);
            if slot_freed {
                self.slot_free.notify();
            }
            return Ok(item);
        }

        self.metrics.terminated_pops.fetch_add(1, Ordering::Relaxed);
        Err(PoolError::Terminated)
    }

    /// Non-blocking pop. Returns [`PoolError::Empty`] when nothing is
    /// queued and the pool is still live, [`PoolError::Terminated`] when
    /// it is drained and terminating.
    pub fn try_pop(&self) -> PoolResult<T> {
        let mut state = self.state.lock();

        if let Some(item) = state.buffer.pop_front() {
            self.metrics.total_popped.fetch_add(1, Ordering::Relaxed);
            let slot_freed = self.capacity.has_free_slot(state.buffer.len());
            drop(state);
            if slot_freed {
                self.slot_free.notify();
            }
            return Ok(item);
        }

        if state.termination.should_terminate() {
            self.metrics.terminated_pops.fetch_add(1, Ordering::Relaxed);
            Err(PoolError::Terminated)
        } else {
            Err(PoolError::Empty)
        }
    }

    /// Async push in the polling style: retries [`WorkPool::try_push`]
    /// until a slot frees up or the configured operation timeout expires.
    /// Expiry is a retryable [`PoolError::Timeout`], never fatal.
    pub async fn push_async(&self, item: T) -> PoolResult<()> {
        let timeout = self.operation_timeout.unwrap_or(Duration::from_secs(30));
        let deadline = tokio::time::Instant::now() + timeout;
        let mut item = item;

        loop {
            match self.try_push(item) {
                Ok(()) => return Ok(()),
                Err(FullError(rejected)) => {
                    if tokio::time::Instant::now() >= deadline {
                        return Err(PoolError::Timeout(timeout));
                    }
                    item = rejected;
                    tokio::time::sleep(ASYNC_POLL_INTERVAL).await;
                }
            }
        }
    }

    /// Async pop in the polling style. Termination propagates
    /// immediately; an empty live pool is retried until the configured
    /// operation timeout expires.
    pub async fn pop_async(&self) -> PoolResult<T> {
        let timeout = self.operation_timeout.unwrap_or(Duration::from_secs(30));

        tokio::time::timeout(timeout, async {
            loop {
                match self.try_pop() {
                    Ok(item) => return Ok(item),
                    Err(PoolError::Empty) => {
                        tokio::time::sleep(ASYNC_POLL_INTERVAL).await;
                    }
                    Err(other) => return Err(other),
                }
            }
        })
        .await
        .map_err(|_| PoolError::Timeout(timeout))?
    }

    /// Number of items currently queued. May be stale the instant it
    /// returns given concurrent producers and consumers.
    pub fn len(&self) -> usize {
        self.state.lock().buffer.len()
    }

    /// Whether the buffer is currently empty
    pub fn is_empty(&self) -> bool {
        self.state.lock().buffer.is_empty()
    }

    /// True once the session has started and every registered terminator
    /// has voted
    pub fn is_terminating(&self) -> bool {
        self.state.lock().termination.should_terminate()
    }

    /// Add one required `terminate` vote.
    ///
    /// # Panics
    ///
    /// Panics if called after [`WorkPool::start`].
    pub fn register_terminator(&self) {
        let mut state = self.state.lock();
        state.termination.register();
    }

    /// Begin the producer/consumer session.
    ///
    /// # Panics
    ///
    /// Panics on a second call, or if no terminator was registered.
    pub fn start(&self) {
        let mut state = self.state.lock();
        state.termination.start();
        #[cfg(feature = "tracing")]
        tracing::debug!("work pool session started");
        self.started.notify_all();
    }

    /// Cast one termination vote. Blocks until [`WorkPool::start`] has
    /// run, then wakes every blocked producer and consumer so they
    /// re-check their exit condition.
    ///
    /// # Panics
    ///
    /// Panics when called more times than terminators were registered.
    pub fn terminate(&self) {
        {
            let mut state = self.state.lock();
            while !state.termination.started() {
                self.started.wait(&mut state);
            }
            let _fully_terminated = state.termination.terminate();
            #[cfg(feature = "tracing")]
            if _fully_terminated {
                tracing::debug!("final terminator voted; pool is draining");
            }
        }
        self.slot_free.notify();
        self.item_ready.notify();
    }

    /// Metrics snapshot for this pool
    pub fn metrics(&self) -> PoolMetrics {
        let queued = self.state.lock().buffer.len();
        self.metrics.snapshot(queued, self.capacity.limit())
    }

    /// Export metrics as a HashMap
    pub fn export_metrics(&self) -> HashMap<String, String> {
        self.metrics().export()
    }

    /// Export metrics in Prometheus format
    pub fn export_metrics_prometheus(
        &self,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        MetricsExporter::export_prometheus(&self.metrics(), pool_name, tags)
    }

    /// Point-in-time health snapshot
    pub fn health_status(&self) -> HealthStatus {
        let state = self.state.lock();
        HealthStatus::new(
            state.buffer.len(),
            self.capacity.limit(),
            state.termination.should_terminate(),
        )
    }
}

/// Single-threaded work pool: the same surface as [`WorkPool`] with no
/// synchronization cost.
///
/// State lives in a `RefCell`, so the type is `!Sync` and the compiler
/// enforces the one-thread precondition a null mutex could only assume.
/// With a single thread a blocked operation could never be satisfied, so
/// anything that would block on a [`WorkPool`] panics here instead of
/// deadlocking.
///
/// # Examples
///
/// ```
/// use esox_workpool::{LocalPool, PoolError};
///
/// let pool = LocalPool::unbounded();
/// pool.register_terminator();
/// pool.start();
///
/// pool.push("job");
/// pool.terminate();
///
/// assert_eq!(pool.pop(), Ok("job"));
/// assert_eq!(pool.pop(), Err(PoolError::Terminated));
/// ```
pub struct LocalPool<T> {
    state: RefCell<PoolState<T>>,
    capacity: Capacity,
}

impl<T> LocalPool<T> {
    /// Create a new pool from a configuration. The notify policy and
    /// operation timeout are irrelevant with one thread and ignored.
    pub fn new(config: PoolConfiguration) -> Self {
        Self {
            state: RefCell::new(PoolState::new()),
            capacity: config.capacity,
        }
    }

    /// Pool bounded at `capacity` items
    pub fn bounded(capacity: usize) -> Self {
        Self::new(PoolConfiguration::new().with_capacity(capacity))
    }

    /// Pool with no capacity limit
    pub fn unbounded() -> Self {
        Self::new(PoolConfiguration::new().unbounded())
    }

    /// Append an item.
    ///
    /// # Panics
    ///
    /// Panics if the pool has terminated, or if the buffer is full - with
    /// one thread no consumer can ever free a slot, so waiting would
    /// deadlock.
    pub fn push(&self, item: T) {
        let mut state = self.state.borrow_mut();
        if state.termination.should_terminate() {
            panic!("push on a terminated work pool");
        }
        if !self.capacity.has_free_slot(state.buffer.len()) {
            panic!("push would deadlock: pool is full and no other thread can pop");
        }
        state.buffer.push_back(item);
    }

    /// Remove and return the oldest item.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty while the pool is still live - with
    /// one thread no producer can ever push, so waiting would deadlock.
    pub fn pop(&self) -> PoolResult<T> {
        let mut state = self.state.borrow_mut();
        if let Some(item) = state.buffer.pop_front() {
            return Ok(item);
        }
        if state.termination.should_terminate() {
            return Err(PoolError::Terminated);
        }
        panic!("pop would deadlock: pool is empty and no other thread can push");
    }

    /// Number of items currently queued
    pub fn len(&self) -> usize {
        self.state.borrow().buffer.len()
    }

    /// Whether the buffer is currently empty
    pub fn is_empty(&self) -> bool {
        self.state.borrow().buffer.is_empty()
    }

    /// True once the session has started and every registered terminator
    /// has voted
    pub fn is_terminating(&self) -> bool {
        self.state.borrow().termination.should_terminate()
    }

    /// Add one required `terminate` vote.
    ///
    /// # Panics
    ///
    /// Panics if called after [`LocalPool::start`].
    pub fn register_terminator(&self) {
        self.state.borrow_mut().termination.register();
    }

    /// Begin the session.
    ///
    /// # Panics
    ///
    /// Panics on a second call, or if no terminator was registered.
    pub fn start(&self) {
        self.state.borrow_mut().termination.start();
    }

    /// Cast one termination vote.
    ///
    /// # Panics
    ///
    /// Panics if [`LocalPool::start`] has not run - there is no other
    /// thread to wait for - or when called more times than terminators
    /// were registered.
    pub fn terminate(&self) {
        let mut state = self.state.borrow_mut();
        if !state.termination.started() {
            panic!("terminate before start on a single-threaded pool");
        }
        state.termination.terminate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn fifo_order_is_preserved() {
        let pool = WorkPool::bounded(10);
        pool.push("a");
        pool.push("b");
        pool.push("c");

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.pop(), Ok("a"));
        assert_eq!(pool.pop(), Ok("b"));
        assert_eq!(pool.pop(), Ok("c"));
        assert!(pool.is_empty());
    }

    #[test]
    fn try_push_hands_back_the_rejected_item() {
        let pool = WorkPool::bounded(2);
        assert!(pool.try_push(1).is_ok());
        assert!(pool.try_push(2).is_ok());

        let rejected = pool.try_push(3).unwrap_err();
        assert_eq!(rejected.into_inner(), 3);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn try_pop_distinguishes_empty_from_terminated() {
        let pool: WorkPool<i32> = WorkPool::bounded(4);
        assert_eq!(pool.try_pop(), Err(PoolError::Empty));

        pool.register_terminator();
        pool.start();
        pool.terminate();
        assert_eq!(pool.try_pop(), Err(PoolError::Terminated));
    }

    #[test]
    fn queued_items_drain_after_termination() {
        let pool = WorkPool::bounded(10);
        pool.register_terminator();
        pool.start();

        pool.push(1);
        pool.push(2);
        pool.push(3);
        pool.terminate();
        assert!(pool.is_terminating());

        assert_eq!(pool.pop(), Ok(1));
        assert_eq!(pool.pop(), Ok(2));
        assert_eq!(pool.pop(), Ok(3));
        assert_eq!(pool.pop(), Err(PoolError::Terminated));
    }

    #[test]
    fn every_terminator_must_vote() {
        let pool: WorkPool<i32> = WorkPool::bounded(4);
        pool.register_terminator();
        pool.register_terminator();
        pool.register_terminator();
        pool.start();

        pool.terminate();
        assert!(!pool.is_terminating());
        pool.terminate();
        assert!(!pool.is_terminating());
        pool.terminate();
        assert!(pool.is_terminating());
    }

    #[test]
    #[should_panic(expected = "push on a terminated work pool")]
    fn push_after_termination_panics() {
        let pool = WorkPool::bounded(4);
        pool.register_terminator();
        pool.start();
        pool.terminate();
        pool.push(1);
    }

    #[test]
    #[should_panic(expected = "start called twice")]
    fn double_start_panics() {
        let pool: WorkPool<i32> = WorkPool::bounded(4);
        pool.register_terminator();
        pool.start();
        pool.start();
    }

    #[test]
    fn unbounded_pool_accepts_everything_without_blocking() {
        let pool = WorkPool::unbounded();
        for i in 0..10_000 {
            pool.push(i);
        }
        assert_eq!(pool.len(), 10_000);
        assert_eq!(pool.pop(), Ok(0));
    }

    #[test]
    fn terminate_blocks_until_start() {
        let pool: Arc<WorkPool<i32>> = Arc::new(WorkPool::bounded(4));
        pool.register_terminator();

        let voter = {
            let pool = Arc::clone(&pool);
            thread::spawn(move || pool.terminate())
        };

        // The vote must not land before start; give the thread a moment
        // to reach its wait.
        thread::sleep(Duration::from_millis(50));
        assert!(!pool.is_terminating());

        pool.start();
        voter.join().unwrap();
        assert!(pool.is_terminating());
    }

    #[test]
    fn metrics_count_traffic() {
        let pool = WorkPool::bounded(4);
        pool.push(1);
        pool.push(2);
        let _ = pool.pop();

        let metrics = pool.metrics();
        assert_eq!(metrics.total_pushed, 2);
        assert_eq!(metrics.total_popped, 1);
        assert_eq!(metrics.queued_items, 1);
    }

    #[test]
    fn health_reflects_draining() {
        let pool = WorkPool::bounded(4);
        pool.register_terminator();
        pool.start();
        pool.push(1);
        pool.terminate();

        let health = pool.health_status();
        assert!(health.is_terminating);
        assert_eq!(health.queued_items, 1);
    }

    #[tokio::test]
    async fn pop_async_returns_queued_item() {
        let pool = WorkPool::bounded(4);
        pool.push(7);
        assert_eq!(pool.pop_async().await, Ok(7));
    }

    #[tokio::test]
    async fn pop_async_times_out_on_a_live_empty_pool() {
        let config = PoolConfiguration::new()
            .with_capacity(4)
            .with_timeout(Duration::from_millis(50));
        let pool: WorkPool<i32> = WorkPool::new(config);

        match pool.pop_async().await {
            Err(PoolError::Timeout(_)) => {}
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn pop_async_sees_termination_immediately() {
        let pool: WorkPool<i32> = WorkPool::bounded(4);
        pool.register_terminator();
        pool.start();
        pool.terminate();

        assert_eq!(pool.pop_async().await, Err(PoolError::Terminated));
    }

    #[tokio::test]
    async fn push_async_waits_for_a_slot() {
        let pool = Arc::new(WorkPool::bounded(1));
        pool.push(1);

        let producer = {
            let pool = Arc::clone(&pool);
            tokio::spawn(async move { pool.push_async(2).await })
        };

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(pool.pop(), Ok(1));

        producer.await.unwrap().unwrap();
        assert_eq!(pool.pop(), Ok(2));
    }

    #[test]
    fn local_pool_drains_then_terminates() {
        let pool = LocalPool::bounded(4);
        pool.register_terminator();
        pool.start();

        pool.push(1);
        pool.push(2);
        pool.terminate();

        assert_eq!(pool.pop(), Ok(1));
        assert_eq!(pool.pop(), Ok(2));
        assert_eq!(pool.pop(), Err(PoolError::Terminated));
    }

    #[test]
    #[should_panic(expected = "pop would deadlock")]
    fn local_pool_pop_on_live_empty_pool_panics() {
        let pool: LocalPool<i32> = LocalPool::bounded(4);
        let _ = pool.pop();
    }

    #[test]
    #[should_panic(expected = "push would deadlock")]
    fn local_pool_push_on_full_pool_panics() {
        let pool = LocalPool::bounded(1);
        pool.push(1);
        pool.push(2);
    }

    #[test]
    #[should_panic(expected = "terminate before start")]
    fn local_pool_terminate_before_start_panics() {
        let pool: LocalPool<i32> = LocalPool::bounded(4);
        pool.register_terminator();
        pool.terminate();
    }
}
