//! The registry of connected sessions.
//!
//! Holds one [`SessionLink`] per authenticated character so handlers can
//! push unsolicited messages (mail notifications, broadcasts) to whoever is
//! online. Sessions register on authentication and deregister on
//! disconnect; a character that is not here is simply offline.

use std::collections::HashMap;

use tokio::sync::Mutex;

use ravengate_protocol::Message;

use crate::SessionLink;

/// Process-wide map of connected characters, shared by all connection
/// workers. Owned by the server; handlers receive it by reference.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    links: Mutex<HashMap<u32, SessionLink>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session's push handle under its character id.
    ///
    /// A stale entry for the same character (a connection that died
    /// without clean teardown) is replaced.
    pub async fn insert(&self, link: SessionLink) {
        let char_id = link.char_id();
        self.links.lock().await.insert(char_id, link);
        tracing::info!(%char_id, "session registered");
    }

    /// Removes a character's push handle on disconnect.
    pub async fn remove(&self, char_id: u32) {
        if self.links.lock().await.remove(&char_id).is_some() {
            tracing::info!(%char_id, "session deregistered");
        }
    }

    /// Returns the push handle for a character, if they are online.
    pub async fn get(&self, char_id: u32) -> Option<SessionLink> {
        self.links.lock().await.get(&char_id).cloned()
    }

    /// Number of connected sessions.
    pub async fn len(&self) -> usize {
        self.links.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.links.lock().await.is_empty()
    }

    /// Pushes a message to every connected session, returning how many
    /// queues accepted it. Dead links are skipped; one session's failure
    /// never affects another's delivery.
    pub async fn broadcast(&self, message: &Message) -> usize {
        let links = self.links.lock().await;
        let mut delivered = 0;
        for link in links.values() {
            match link.queue_message(message) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::debug!(
                        char_id = %link.char_id(),
                        error = %e,
                        "broadcast skipped dead session"
                    );
                }
            }
        }
        delivered
    }
}
