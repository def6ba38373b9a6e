//! Persistent mailbox for Ravengate.
//!
//! Mail survives sessions: it is written to the store on send and read
//! back on listing. Delivery to an online recipient additionally pushes a
//! casted-binary alert through their session link; offline recipients see
//! the mail at their next listing. Reads are monotonic and deletes are
//! soft.

mod error;
mod model;
mod service;

pub use error::MailError;
pub use model::{Mail, MailDraft};
pub use service::{MailService, LIST_PAGE_SIZE};
