//! Rendezvous semaphores for Ravengate.
//!
//! A semaphore (in this protocol's vocabulary) is a named,
//! capacity-bounded membership barrier that groups concurrent sessions
//! into a shared multiplayer context. It has nothing to do with an
//! OS/mutex semaphore beyond the name.
//!
//! # Key types
//!
//! - [`SemaphoreManager`] — the injected service object owning the registry
//! - [`SemaphoreId`] — the client-named identity
//! - [`CreateMode`] — exclusive vs. converge-on-existing creation
//! - [`SemaphoreView`] — the consistent snapshot returned to joiners

mod error;
mod manager;

pub use error::SemaphoreError;
pub use manager::{CreateMode, SemaphoreId, SemaphoreManager, SemaphoreView};
