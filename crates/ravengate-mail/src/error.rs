use thiserror::Error;

use ravengate_protocol::ProtocolError;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail {0} not found")]
    NotFound(i64),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// The delivery alert could not be built — a stored sender name that
    /// cannot cross the wire is a data-integrity failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl MailError {
    /// Expected domain outcome vs. infrastructure fault; handlers answer
    /// the former with a failure ack.
    pub fn is_domain(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
