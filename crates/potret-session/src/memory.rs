//! In-memory session store backed by DashMap.
//!
//! Values are kept as serialized JSON strings, matching the remote
//! key-value contract of the Redis backend, so decode-failure handling
//! behaves identically across backends. Expiry is checked lazily on
//! `get`; there is no background sweep.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::warn;

use potret_core::{ChatId, PromptParams, Session};

use crate::store::SessionStore;

struct StoredValue {
    json: String,
    written_at: Instant,
}

pub struct MemorySessionStore {
    entries: DashMap<ChatId, StoredValue>,
    ttl: Duration,
    defaults: PromptParams,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration, defaults: PromptParams) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            defaults,
        }
    }

    #[cfg(test)]
    fn put_raw(&self, id: ChatId, json: &str) {
        self.entries.insert(
            id,
            StoredValue {
                json: json.to_string(),
                written_at: Instant::now(),
            },
        );
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, id: ChatId) -> Option<Session> {
        let entry = self.entries.get(&id)?;
        if entry.written_at.elapsed() > self.ttl {
            drop(entry);
            self.entries.remove(&id);
            return None;
        }
        match serde_json::from_str(&entry.json) {
            Ok(session) => Some(session),
            Err(e) => {
                drop(entry);
                warn!("discarding corrupt session record for chat {id}: {e}");
                self.entries.remove(&id);
                None
            }
        }
    }

    async fn create(&self, id: ChatId) -> Session {
        let mut session = Session::new(id, self.defaults.clone());
        self.put(&mut session).await;
        session
    }

    async fn put(&self, session: &mut Session) {
        session.last_activity_at = chrono::Utc::now();
        let json = match serde_json::to_string(session) {
            Ok(j) => j,
            Err(e) => {
                warn!("failed to serialize session for chat {}: {e}", session.id);
                return;
            }
        };
        self.entries.insert(
            session.id,
            StoredValue {
                json,
                written_at: Instant::now(),
            },
        );
    }

    async fn remove(&self, id: ChatId) {
        self.entries.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(ttl: Duration) -> MemorySessionStore {
        MemorySessionStore::new(ttl, PromptParams::default())
    }

    #[tokio::test]
    async fn get_within_ttl_returns_record() {
        let store = store(Duration::from_millis(80));
        store.create(1).await;
        std::thread::sleep(Duration::from_millis(40));
        assert!(store.get(1).await.is_some());
    }

    #[tokio::test]
    async fn get_past_ttl_returns_absent() {
        let store = store(Duration::from_millis(20));
        store.create(1).await;
        std::thread::sleep(Duration::from_millis(40));
        assert!(store.get(1).await.is_none());
    }

    #[tokio::test]
    async fn put_slides_the_expiry_window() {
        let store = store(Duration::from_millis(60));
        let mut session = store.create(1).await;
        std::thread::sleep(Duration::from_millis(40));
        store.put(&mut session).await;
        std::thread::sleep(Duration::from_millis(40));
        // 80ms after creation but only 40ms after the last write.
        assert!(store.get(1).await.is_some());
    }

    #[tokio::test]
    async fn corrupt_value_is_treated_as_absent() {
        let store = store(Duration::from_secs(60));
        store.put_raw(1, "{not valid json");
        assert!(store.get(1).await.is_none());
        // The corrupt entry is dropped, not retried.
        assert!(store.entries.get(&1).is_none());
    }

    #[tokio::test]
    async fn put_refreshes_last_activity() {
        let store = store(Duration::from_secs(60));
        let mut session = store.create(1).await;
        let first = session.last_activity_at;
        std::thread::sleep(Duration::from_millis(10));
        store.put(&mut session).await;
        assert!(session.last_activity_at > first);
    }
}
