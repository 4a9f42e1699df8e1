//! Error types for the work pool

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("pool terminated - every terminator has voted and the buffer is drained")]
    Terminated,

    #[error("pool is empty - no items queued")]
    Empty,

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),
}

pub type PoolResult<T> = Result<T, PoolError>;

/// Returned by a failed `try_push`, handing the rejected item back to the
/// caller so it is never dropped on the floor.
#[derive(Error, Debug)]
#[error("pool is at capacity")]
pub struct FullError<T>(pub T);

impl<T> FullError<T> {
    /// Recover the item that did not fit.
    pub fn into_inner(self) -> T {
        self.0
    }
}
