//! The semaphore manager: a registry of named rendezvous barriers.
//!
//! A semaphore here is a capacity-bounded membership barrier that groups
//! sessions into a shared multiplayer context (a hunting party gathering
//! point), not an OS synchronization primitive. Many sessions call
//! create/check concurrently while rendezvousing on the same identity; the
//! manager guarantees that concurrent creates resolve to a single winner
//! and that no two joins can both take the last free slot.
//!
//! # Concurrency note
//!
//! One mutex guards the whole registry. Every mutating operation on an
//! identity is therefore mutually exclusive with every other, which is
//! what makes the capacity check and the winner-take-one create hold. The
//! manager is a long-lived service object owned by the server and handed
//! to handlers by reference — there is no ambient global.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tokio::sync::Mutex;

use crate::SemaphoreError;

/// The identity of a semaphore, fixed by the client request that names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemaphoreId(pub u32);

impl fmt::Display for SemaphoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// Whether a create call tolerates an existing identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    /// Fail with [`SemaphoreError::AlreadyExists`] if the identity exists.
    Exclusive,
    /// Converge on the existing semaphore: the loser of a create race
    /// observes the winner's capacity and payload instead of an error.
    Reuse,
}

/// A consistent snapshot of one semaphore, returned by create and check so
/// newly joined clients can synchronize on the shared context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemaphoreView {
    pub id: SemaphoreId,
    pub capacity: u16,
    pub member_count: usize,
    pub payload: Vec<u8>,
}

struct Semaphore {
    capacity: u16,
    members: HashSet<u32>,
    payload: Vec<u8>,
}

impl Semaphore {
    fn view(&self, id: SemaphoreId) -> SemaphoreView {
        SemaphoreView {
            id,
            capacity: self.capacity,
            member_count: self.members.len(),
            payload: self.payload.clone(),
        }
    }
}

/// Manages all live semaphores.
///
/// Lifecycle per identity: `absent → created → (checked/released)* → deleted`.
#[derive(Default)]
pub struct SemaphoreManager {
    semaphores: Mutex<HashMap<SemaphoreId, Semaphore>>,
}

impl SemaphoreManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a semaphore with zero members, or resolves against an
    /// existing one according to `mode`.
    pub async fn create(
        &self,
        id: SemaphoreId,
        capacity: u16,
        payload: Vec<u8>,
        mode: CreateMode,
    ) -> Result<SemaphoreView, SemaphoreError> {
        let mut semaphores = self.semaphores.lock().await;
        if let Some(existing) = semaphores.get(&id) {
            return match mode {
                CreateMode::Exclusive => {
                    Err(SemaphoreError::AlreadyExists(id))
                }
                CreateMode::Reuse => Ok(existing.view(id)),
            };
        }
        let semaphore = Semaphore {
            capacity,
            members: HashSet::new(),
            payload,
        };
        let view = semaphore.view(id);
        semaphores.insert(id, semaphore);
        tracing::info!(%id, capacity, "semaphore created");
        Ok(view)
    }

    /// Joins a session to a semaphore and returns the resulting snapshot.
    ///
    /// A member checking again observes the current state without being
    /// counted twice. The member count a caller observes is monotonically
    /// non-decreasing until a release or delete.
    ///
    /// # Errors
    /// [`SemaphoreError::NotFound`] if the identity was deleted;
    /// [`SemaphoreError::AtCapacity`] if the member set is full — an
    /// ordinary domain failure, membership unchanged.
    pub async fn check(
        &self,
        id: SemaphoreId,
        char_id: u32,
    ) -> Result<SemaphoreView, SemaphoreError> {
        let mut semaphores = self.semaphores.lock().await;
        let semaphore = semaphores
            .get_mut(&id)
            .ok_or(SemaphoreError::NotFound(id))?;

        if !semaphore.members.contains(&char_id) {
            if semaphore.members.len() >= semaphore.capacity as usize {
                return Err(SemaphoreError::AtCapacity {
                    id,
                    capacity: semaphore.capacity,
                });
            }
            semaphore.members.insert(char_id);
            tracing::debug!(
                %id, %char_id,
                members = semaphore.members.len(),
                "semaphore joined"
            );
        }
        Ok(semaphore.view(id))
    }

    /// Removes a session from a semaphore's member set. The semaphore
    /// itself persists even at zero members; only an explicit delete
    /// removes it.
    pub async fn release(
        &self,
        id: SemaphoreId,
        char_id: u32,
    ) -> Result<(), SemaphoreError> {
        let mut semaphores = self.semaphores.lock().await;
        let semaphore = semaphores
            .get_mut(&id)
            .ok_or(SemaphoreError::NotFound(id))?;
        if semaphore.members.remove(&char_id) {
            tracing::debug!(
                %id, %char_id,
                members = semaphore.members.len(),
                "semaphore released"
            );
        }
        Ok(())
    }

    /// Deletes a semaphore unconditionally. Returns whether it existed.
    /// Checks racing this call fail cleanly with `NotFound`.
    pub async fn delete(&self, id: SemaphoreId) -> bool {
        let existed = self.semaphores.lock().await.remove(&id).is_some();
        if existed {
            tracing::info!(%id, "semaphore deleted");
        }
        existed
    }

    /// Implicit release across all semaphores, used on disconnect. Never
    /// deletes anything — other members and the semaphores persist.
    pub async fn release_all(&self, char_id: u32) {
        let mut semaphores = self.semaphores.lock().await;
        for (id, semaphore) in semaphores.iter_mut() {
            if semaphore.members.remove(&char_id) {
                tracing::debug!(%id, %char_id, "implicit semaphore release");
            }
        }
    }

    /// Number of live semaphores.
    pub async fn len(&self) -> usize {
        self.semaphores.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.semaphores.lock().await.is_empty()
    }

    /// Current member count for an identity, if it exists.
    pub async fn member_count(&self, id: SemaphoreId) -> Option<usize> {
        self.semaphores
            .lock()
            .await
            .get(&id)
            .map(|s| s.members.len())
    }
}
