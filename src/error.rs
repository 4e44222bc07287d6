//! Error types for queue operations.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueueError>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The allocator could not provide memory for a ghost node, an element
    /// node, or the copy of an element's text.
    #[error("out of memory while allocating {what}")]
    AllocationFailed { what: &'static str },

    #[error("no queue with id {0} in the group")]
    NotFound(usize),

    /// The queue was spliced into another one by a merge and no longer owns
    /// any elements.
    #[error("queue {0} has been absorbed by a merge")]
    Absorbed(usize),
}

impl QueueError {
    pub(crate) fn alloc(what: &'static str) -> Self {
        tracing::warn!("allocation of {} failed", what);
        QueueError::AllocationFailed { what }
    }
}
