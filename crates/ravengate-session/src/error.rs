//! Error types for the session layer.

/// Errors that can occur in session state and ack correlation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The client referenced a mailbox index that is no longer backed by
    /// the session cache (the allocation cursor wrapped past it, or no
    /// listing was ever made). This is a client-protocol error: the server
    /// reports failure for the operation and keeps the connection alive.
    #[error("stale mailbox index {0}")]
    StaleMailIndex(u8),

    /// The session's outbound queue is closed — the connection is gone.
    #[error("session for character {0} has disconnected")]
    Disconnected(u32),

    /// A protocol-level failure while building an outbound message.
    #[error(transparent)]
    Protocol(#[from] ravengate_protocol::ProtocolError),
}
