//! Error types for the semaphore layer.

use crate::SemaphoreId;

/// Errors that can occur during semaphore operations.
///
/// All of these are ordinary domain failures: they travel back to the
/// requesting client as a fail acknowledgment and never escalate to a
/// fatal abort.
#[derive(Debug, thiserror::Error)]
pub enum SemaphoreError {
    /// No semaphore exists under this identity. A check racing a delete
    /// lands here and fails cleanly.
    #[error("semaphore {0} not found")]
    NotFound(SemaphoreId),

    /// An exclusive create hit an identity that already exists.
    #[error("semaphore {0} already exists")]
    AlreadyExists(SemaphoreId),

    /// The member set is full; the join is refused and the count is
    /// unchanged.
    #[error("semaphore {id} is at capacity {capacity}")]
    AtCapacity { id: SemaphoreId, capacity: u16 },
}
