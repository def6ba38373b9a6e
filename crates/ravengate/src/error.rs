//! Unified error type for the Ravengate server.

use ravengate_guild::GuildError;
use ravengate_mail::MailError;
use ravengate_protocol::ProtocolError;
use ravengate_semaphore::SemaphoreError;
use ravengate_session::SessionError;

/// Top-level error wrapping every layer's error type, so server code can
/// use `?` across layers and callers match on one enum.
#[derive(Debug, thiserror::Error)]
pub enum RavengateError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Semaphore(#[from] SemaphoreError),

    #[error(transparent)]
    Guild(#[from] GuildError),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error(transparent)]
    Store(#[from] sqlx::Error),

    /// A connection sent something other than a login as its first frame.
    #[error("first frame must be a login")]
    LoginExpected,
}
