//! Pool configuration options

use std::time::Duration;

/// Capacity limit applied to the pool's buffer.
///
/// # Examples
///
/// ```
/// use esox_workpool::Capacity;
///
/// let bounded = Capacity::Bounded(4);
/// assert!(bounded.has_free_slot(3));
/// assert!(!bounded.has_free_slot(4));
///
/// assert!(Capacity::Unbounded.has_free_slot(usize::MAX));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// The buffer holds at most this many items; producers block beyond it.
    Bounded(usize),

    /// No upper limit; producers never block.
    Unbounded,
}

impl Capacity {
    /// Whether a buffer currently holding `current_len` items can accept
    /// one more.
    pub fn has_free_slot(&self, current_len: usize) -> bool {
        match self {
            Capacity::Bounded(max) => current_len < *max,
            Capacity::Unbounded => true,
        }
    }

    /// The numeric bound, `None` for unbounded pools.
    pub fn limit(&self) -> Option<usize> {
        match self {
            Capacity::Bounded(max) => Some(*max),
            Capacity::Unbounded => None,
        }
    }
}

/// How blocked threads are woken when the buffer state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyPolicy {
    /// Wake every waiter on each state change. Waiters re-check their
    /// predicate after waking, so a thundering herd is safe. The default.
    #[default]
    All,

    /// Never wake anyone; blocked threads re-check their predicate on a
    /// short polling interval instead.
    None,
}

/// Configuration for work pool behavior
///
/// # Examples
///
/// ```
/// use esox_workpool::{Capacity, PoolConfiguration};
/// use std::time::Duration;
///
/// let config = PoolConfiguration::new()
///     .with_capacity(64)
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.capacity, Capacity::Bounded(64));
/// assert_eq!(config.operation_timeout, Some(Duration::from_secs(5)));
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfiguration {
    /// Capacity limit for the buffer
    pub capacity: Capacity,

    /// How waiters are woken on buffer state changes
    pub notify_policy: NotifyPolicy,

    /// Deadline for the async push/pop adapters
    pub operation_timeout: Option<Duration>,
}

impl Default for PoolConfiguration {
    fn default() -> Self {
        Self {
            capacity: Capacity::Bounded(100),
            notify_policy: NotifyPolicy::All,
            operation_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl PoolConfiguration {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the buffer at `size` items
    pub fn with_capacity(mut self, size: usize) -> Self {
        self.capacity = Capacity::Bounded(size);
        self
    }

    /// Remove the capacity limit; producers never block
    pub fn unbounded(mut self) -> Self {
        self.capacity = Capacity::Unbounded;
        self
    }

    /// Select the wake strategy for blocked threads
    pub fn with_notify_policy(mut self, policy: NotifyPolicy) -> Self {
        self.notify_policy = policy;
        self
    }

    /// Set the deadline used by the async adapters
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }
}
