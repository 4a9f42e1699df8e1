//! Wait/notify channels for blocked producers and consumers
//!
//! Each pool owns two independent signals, "slot free" and "item ready".
//! Sharing one channel between them could let a full set of consumers
//! starve a producer of wakeups (and vice versa).

use crate::config::NotifyPolicy;
use parking_lot::{Condvar, MutexGuard};
use std::time::Duration;

/// Re-check interval for [`NotifyPolicy::None`], where nobody ever
/// notifies and waits must expire on their own.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub(crate) struct Signal {
    cv: Condvar,
    policy: NotifyPolicy,
}

impl Signal {
    pub(crate) fn new(policy: NotifyPolicy) -> Self {
        Self {
            cv: Condvar::new(),
            policy,
        }
    }

    /// Releases the guard, suspends until woken, reacquires the guard
    /// before returning. Spurious wakeups are possible under either
    /// policy; callers must re-check their predicate in a loop.
    pub(crate) fn wait<T: ?Sized>(&self, guard: &mut MutexGuard<'_, T>) {
        match self.policy {
            NotifyPolicy::All => {
                self.cv.wait(guard);
            }
            NotifyPolicy::None => {
                // Timed wait instead of a plain one: with no notifier the
                // predicate loop degrades to polling rather than hanging.
                let _ = self.cv.wait_for(guard, POLL_INTERVAL);
            }
        }
    }

    /// Wakes all threads currently blocked in [`Signal::wait`].
    pub(crate) fn notify(&self) {
        if self.policy == NotifyPolicy::All {
            self.cv.notify_all();
        }
    }
}
