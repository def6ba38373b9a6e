//! Session management for Ravengate.
//!
//! This crate handles everything tied to one live connection:
//!
//! 1. **Identity** — a [`Session`] owns exactly one authenticated
//!    character for its lifetime.
//! 2. **Ack correlation** — success/fail acknowledgments that echo the
//!    client-chosen handle verbatim.
//! 3. **Mailbox index cache** — the bounded, cursor-wrapped map from
//!    client-visible indices to mailbox row ids.
//! 4. **Outbound queue** — the channel the connection writer drains,
//!    where solicited acks and unsolicited pushes interleave.
//! 5. **Registry** — the process-wide map of who is online
//!    ([`SessionRegistry`]), used for pushes and broadcasts.
//!
//! # How it fits in the stack
//!
//! ```text
//! Handlers (above)  ← run against a Session, push to others via the registry
//!     ↕
//! Session layer (this crate)
//!     ↕
//! Protocol layer (below)  ← provides Message, encode_framed
//! ```

mod error;
mod registry;
mod session;

pub use error::SessionError;
pub use registry::SessionRegistry;
pub use session::{Session, SessionLink, MAIL_CACHE_CAPACITY};
