//! # Ravengate
//!
//! Channel server for a legacy hunting-game protocol: a TCP loop speaking
//! opcode-framed binary messages, ack-handle correlated request/response,
//! rendezvous semaphores for party gathering, and transactional guild and
//! mailbox services over a persistent store.
//!
//! The workspace layers are re-exported here so embedders need only this
//! crate:
//!
//! ```text
//! TCP ── handler ── dispatch ──┬── SemaphoreManager
//!        (session, acks)       ├── GuildService ──┐
//!                              ├── MailService  ──┴── SqlitePool
//!                              └── ChatBridge ── SessionRegistry
//! ```

mod bridge;
mod error;
mod handler;
mod handlers_guild;
mod handlers_mail;
mod handlers_misc;
mod handlers_semaphore;
mod server;

pub use bridge::{BridgeEvent, ChatBridge};
pub use error::RavengateError;
pub use server::{RavengateServer, RavengateServerBuilder, ServerConfig};

pub use ravengate_guild as guild;
pub use ravengate_mail as mail;
pub use ravengate_protocol as protocol;
pub use ravengate_semaphore as semaphore;
pub use ravengate_session as session;
