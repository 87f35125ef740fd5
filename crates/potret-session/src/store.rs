//! Trait abstraction for session storage.
//!
//! Allows swapping between the in-memory (DashMap) and Redis-backed
//! stores. Both keep string-serialized session records with a sliding
//! TTL that resets on every write. There is no locking and no
//! compare-and-swap: concurrent events for the same conversation perform
//! independent read-modify-write cycles and the last `put` wins.

use async_trait::async_trait;

use potret_core::{ChatId, Session};

/// Trait for session storage backends.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Returns the stored record, or `None` when the key is absent, the
    /// record has expired, or the stored value fails to decode. Never
    /// fails; decode failures are logged and treated as absence.
    async fn get(&self, id: ChatId) -> Option<Session>;

    /// Initialize a fresh idle session with the configured defaults,
    /// persist it, and return it.
    async fn create(&self, id: ChatId) -> Session;

    /// Persist the session. Refreshes `last_activity_at` to now and
    /// resets the backend's TTL clock (sliding expiration).
    async fn put(&self, session: &mut Session);

    /// Delete the record. Idempotent; removing an absent key is a no-op.
    async fn remove(&self, id: ChatId);

    async fn get_or_create(&self, id: ChatId) -> Session {
        match self.get(id).await {
            Some(session) => session,
            None => self.create(id).await,
        }
    }
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for std::sync::Arc<T> {
    async fn get(&self, id: ChatId) -> Option<Session> {
        (**self).get(id).await
    }

    async fn create(&self, id: ChatId) -> Session {
        (**self).create(id).await
    }

    async fn put(&self, session: &mut Session) {
        (**self).put(session).await
    }

    async fn remove(&self, id: ChatId) {
        (**self).remove(id).await
    }

    async fn get_or_create(&self, id: ChatId) -> Session {
        (**self).get_or_create(id).await
    }
}
