//! Redis-backed session store.
//!
//! Available only when the `redis` cargo feature is enabled.
//! Sessions are stored as JSON values with a Redis TTL that is reset on
//! every write, so the expiry window slides with activity. A corrupt
//! value is deleted and reported as absent; no Redis failure ever
//! reaches the caller as an error.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::warn;

use potret_core::{ChatId, PromptParams, Session};

use crate::store::SessionStore;

/// Key prefix for session data.
const SESSION_PREFIX: &str = "potret:session:";
/// Ceiling on the per-key TTL (6 hours). The store never requests a
/// longer retention than this.
const MAX_TTL_SECS: u64 = 21_600;

/// Redis-backed session store.
///
/// Uses `redis::aio::ConnectionManager` which automatically reconnects on
/// transient failures and is cheaply cloneable.
pub struct RedisSessionStore {
    conn: redis::aio::ConnectionManager,
    ttl: Duration,
    defaults: PromptParams,
}

impl RedisSessionStore {
    /// Create a new Redis session store.
    ///
    /// `redis_url` is a standard Redis connection string, e.g.
    /// `redis://127.0.0.1:6379`. The TTL is clamped to the 6-hour
    /// retention ceiling.
    pub async fn new(
        redis_url: &str,
        ttl: Duration,
        defaults: PromptParams,
    ) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(redis_url)?;
        let conn = redis::aio::ConnectionManager::new(client).await?;
        Ok(Self {
            conn,
            ttl: ttl.min(Duration::from_secs(MAX_TTL_SECS)),
            defaults,
        })
    }

    fn session_key(id: ChatId) -> String {
        format!("{SESSION_PREFIX}{id}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, id: ChatId) -> Option<Session> {
        let key = Self::session_key(id);
        let mut conn = self.conn.clone();
        let json: Option<String> = match conn.get(&key).await {
            Ok(v) => v,
            Err(e) => {
                warn!("Redis GET failed for chat {id}: {e}");
                return None;
            }
        };
        let json = json?;
        match serde_json::from_str(&json) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("discarding corrupt session record for chat {id}: {e}");
                let _: Option<i64> = conn.del(&key).await.ok();
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
        let key = Self::session_key(session.id);
        let json = match serde_json::to_string(session) {
            Ok(j) => j,
            Err(e) => {
                warn!("failed to serialize session for chat {}: {e}", session.id);
                return;
            }
        };
        let mut conn = self.conn.clone();
        if let Err(e) = conn
            .set_ex::<_, _, ()>(&key, &json, self.ttl.as_secs())
            .await
        {
            warn!("Redis SET failed for chat {}: {e}", session.id);
        }
    }

    async fn remove(&self, id: ChatId) {
        let key = Self::session_key(id);
        let mut conn = self.conn.clone();
        if let Err(e) = conn.del::<_, i64>(&key).await {
            warn!("Redis DEL failed for chat {id}: {e}");
        }
    }
}
