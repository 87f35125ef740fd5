use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::PromptParams;

/// File constraints enforced before a photo reaches the conversation
/// engine.
#[derive(Debug, Clone)]
pub struct PhotoLimits {
    pub max_file_size: u64,
    pub allowed_formats: Vec<String>,
    pub min_dimension: u32,
    /// Face-count validation needs an external vision API; off by default.
    pub face_detection_enabled: bool,
}

impl Default for PhotoLimits {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            allowed_formats: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            min_dimension: 512,
            face_detection_enabled: false,
        }
    }
}

/// Immutable bot configuration, constructed once at startup and passed
/// into the store, parser, and engine constructors. Nothing in the
/// libraries reads ambient process-wide state.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Prompt parameters a fresh session starts with.
    pub defaults: PromptParams,
    /// How long after a delivered result free-text revisions are accepted.
    pub revision_window: Duration,
    /// Sliding TTL the session store applies on every write. Must be
    /// strictly longer than `revision_window` so a session is never
    /// evicted before its own deadline can be observed.
    pub session_ttl: Duration,
    /// Caller-imposed ceiling on a single generation call.
    pub generation_timeout: Duration,
    pub limits: PhotoLimits,
}

impl BotConfig {
    pub fn new(
        defaults: PromptParams,
        revision_window: Duration,
        session_ttl: Duration,
        generation_timeout: Duration,
        limits: PhotoLimits,
    ) -> Result<Self> {
        if session_ttl <= revision_window {
            return Err(Error::Internal(format!(
                "session TTL ({session_ttl:?}) must exceed the revision window ({revision_window:?})"
            )));
        }
        Ok(Self {
            defaults,
            revision_window,
            session_ttl,
            generation_timeout,
            limits,
        })
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            defaults: PromptParams::default(),
            revision_window: Duration::from_secs(60),
            // 6 hours, the store-side retention ceiling.
            session_ttl: Duration::from_secs(21_600),
            generation_timeout: Duration::from_secs(120),
            limits: PhotoLimits::default(),
        }
    }
}
