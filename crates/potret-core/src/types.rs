use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ── ID types ──
pub type ChatId = i64;

/// Opaque reference to a photo held by an external service (in practice a
/// Telegram file URL). The core never inspects its contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef(pub String);

impl PhotoRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PhotoRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PhotoRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── Conversation state ──
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotState {
    Idle,
    Processing,
    WaitingRevision,
    Error,
}

impl std::fmt::Display for BotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::WaitingRevision => "waiting_revision",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

impl FromStr for BotState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "processing" => Ok(Self::Processing),
            "waiting_revision" => Ok(Self::WaitingRevision),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown BotState: {other}")),
        }
    }
}

// ── Prompt parameters ──

/// The three generation parameters a user can steer. Always fully
/// populated; revisions merge into it, they never replace it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptParams {
    pub clothing_type: String,
    pub clothing_color: String,
    pub background_color: String,
}

impl PromptParams {
    /// Apply a partial update field-by-field. Absent fields are left
    /// untouched, so merging the same update twice is a no-op the second
    /// time.
    pub fn merge(&mut self, update: &RevisionUpdate) {
        if let Some(bg) = &update.background_color {
            self.background_color = bg.clone();
        }
        if let Some(ty) = &update.clothing_type {
            self.clothing_type = ty.clone();
        }
        if let Some(color) = &update.clothing_color {
            self.clothing_color = color.clone();
        }
    }
}

impl Default for PromptParams {
    fn default() -> Self {
        Self {
            clothing_type: "formal shirt".to_string(),
            clothing_color: "white".to_string(),
            background_color: "blue".to_string(),
        }
    }
}

/// Partial update extracted from one line of revision text. `None` means
/// "do not change"; no field is ever guessed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionUpdate {
    pub background_color: Option<String>,
    pub clothing_type: Option<String>,
    pub clothing_color: Option<String>,
}

impl RevisionUpdate {
    /// A revision is only acted on when at least one field was extracted.
    pub fn is_valid(&self) -> bool {
        self.background_color.is_some()
            || self.clothing_type.is_some()
            || self.clothing_color.is_some()
    }
}

// ── Session ──

/// One per conversation. Persisted as a JSON string value in the session
/// store as a JSON string with camelCase field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: ChatId,
    pub state: BotState,
    pub original_photo_ref: Option<PhotoRef>,
    pub processed_photo_ref: Option<PhotoRef>,
    pub prompt_parameters: PromptParams,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    /// Present iff the session most recently entered WaitingRevision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_deadline: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(id: ChatId, defaults: PromptParams) -> Self {
        let now = Utc::now();
        Self {
            id,
            state: BotState::Idle,
            original_photo_ref: None,
            processed_photo_ref: None,
            prompt_parameters: defaults,
            created_at: now,
            last_activity_at: now,
            revision_deadline: None,
        }
    }
}

// ── Inbound events ──

/// Conversation-boundary commands, mapped onto state-machine events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Cancel,
    Unknown(String),
}

impl Command {
    /// Classify a slash command. The command word is the first token;
    /// anything unrecognized is carried verbatim for reporting.
    pub fn parse(text: &str) -> Self {
        let word = text.trim().split_whitespace().next().unwrap_or("");
        let name = word.trim_start_matches('/').to_ascii_lowercase();
        match name.as_str() {
            "start" | "reset" => Self::Start,
            "help" => Self::Help,
            "cancel" => Self::Cancel,
            _ => Self::Unknown(name),
        }
    }
}

/// One inbound event. Every webhook delivery is classified into exactly
/// one of these before the transition function runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Photo { file: PhotoRef },
    Text { text: String },
    Command(Command),
    /// Lazy deadline probe: destroys the session if its revision window
    /// has already passed, otherwise does nothing.
    Timeout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn session_round_trip_without_deadline() {
        let session = Session::new(42, PromptParams::default());
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("revisionDeadline"));
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn session_round_trip_with_deadline() {
        let mut session = Session::new(42, PromptParams::default());
        session.state = BotState::WaitingRevision;
        session.original_photo_ref = Some("file/abc".into());
        session.processed_photo_ref = Some("https://cdn.example/out.jpg".into());
        session.revision_deadline = Some(Utc::now() + Duration::seconds(60));

        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
        assert!(back.revision_deadline.is_some());
    }

    #[test]
    fn session_uses_camel_case_wire_names() {
        let session = Session::new(7, PromptParams::default());
        let value: serde_json::Value = serde_json::to_value(&session).unwrap();
        assert!(value.get("originalPhotoRef").is_some());
        assert!(value.get("promptParameters").is_some());
        assert!(value["promptParameters"].get("clothing_type").is_some());
        assert_eq!(value["state"], "idle");
    }

    #[test]
    fn merge_is_idempotent() {
        let update = RevisionUpdate {
            background_color: Some("red".into()),
            clothing_type: None,
            clothing_color: Some("black".into()),
        };

        let mut once = PromptParams::default();
        once.merge(&update);
        let mut twice = once.clone();
        twice.merge(&update);

        assert_eq!(once, twice);
        assert_eq!(once.background_color, "red");
        assert_eq!(once.clothing_color, "black");
        assert_eq!(once.clothing_type, "formal shirt");
    }

    #[test]
    fn merge_leaves_absent_fields_untouched() {
        let mut params = PromptParams::default();
        params.merge(&RevisionUpdate::default());
        assert_eq!(params, PromptParams::default());
    }

    #[test]
    fn bot_state_string_round_trip() {
        for state in [
            BotState::Idle,
            BotState::Processing,
            BotState::WaitingRevision,
            BotState::Error,
        ] {
            assert_eq!(state.to_string().parse::<BotState>().unwrap(), state);
        }
        assert!("sleeping".parse::<BotState>().is_err());
    }

    #[test]
    fn command_parsing() {
        assert_eq!(Command::parse("/start"), Command::Start);
        assert_eq!(Command::parse("/reset"), Command::Start);
        assert_eq!(Command::parse("/HELP"), Command::Help);
        assert_eq!(Command::parse("/cancel please"), Command::Cancel);
        assert_eq!(Command::parse("/magic"), Command::Unknown("magic".into()));
    }
}
