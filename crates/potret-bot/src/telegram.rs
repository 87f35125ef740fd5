//! Minimal Telegram Bot API client (long-poll flavor) and the notifier
//! that renders engine outcomes into chat messages.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use potret_core::{ChatId, Command};
use potret_engine::{Notice, Notifier};

use crate::messages;

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
    #[serde(default)]
    pub photo: Vec<PhotoSize>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
    pub file_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct File {
    pub file_path: Option<String>,
    pub file_size: Option<u64>,
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// One inbound message, classified but not yet resolved into a
/// state-machine event (photos still need a `getFile` round-trip).
#[derive(Debug)]
pub enum Inbound {
    Photo(PhotoSize),
    Text(String),
    Command(Command),
}

pub fn classify(message: &Message) -> Option<Inbound> {
    if let Some(photo) = largest_photo(&message.photo) {
        return Some(Inbound::Photo(photo.clone()));
    }
    let text = message.text.as_deref()?.trim();
    if text.is_empty() {
        return None;
    }
    if text.starts_with('/') {
        return Some(Inbound::Command(Command::parse(text)));
    }
    Some(Inbound::Text(text.to_string()))
}

/// Telegram sends several downscaled renditions; the original upload is
/// the largest one.
pub fn largest_photo(sizes: &[PhotoSize]) -> Option<&PhotoSize> {
    sizes.iter().max_by_key(|p| u64::from(p.width) * u64::from(p.height))
}

#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
    file_base: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: format!("https://api.telegram.org/bot{token}"),
            file_base: format!("https://api.telegram.org/file/bot{token}"),
        }
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, payload: &serde_json::Value) -> Result<T> {
        let response = self
            .http
            .post(format!("{}/{method}", self.api_base))
            .json(payload)
            .send()
            .await
            .with_context(|| format!("telegram {method} request failed"))?;
        let body: ApiResponse<T> = response
            .json()
            .await
            .with_context(|| format!("telegram {method} returned malformed JSON"))?;
        if !body.ok {
            bail!(
                "telegram {method} rejected: {}",
                body.description.unwrap_or_default()
            );
        }
        body.result
            .with_context(|| format!("telegram {method} response missing result"))
    }

    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message"],
            }),
        )
        .await
    }

    pub async fn send_message(&self, chat: ChatId, text: &str) -> Result<()> {
        let _: Message = self
            .call("sendMessage", &json!({ "chat_id": chat, "text": text }))
            .await?;
        Ok(())
    }

    pub async fn send_photo(&self, chat: ChatId, photo_url: &str, caption: &str) -> Result<()> {
        let _: Message = self
            .call(
                "sendPhoto",
                &json!({ "chat_id": chat, "photo": photo_url, "caption": caption }),
            )
            .await?;
        Ok(())
    }

    pub async fn get_file(&self, file_id: &str) -> Result<File> {
        self.call("getFile", &json!({ "file_id": file_id })).await
    }

    pub fn file_url(&self, file_path: &str) -> String {
        format!("{}/{file_path}", self.file_base)
    }
}

/// Delivers [`Notice`]s as chat messages. Delivery failures are logged
/// and swallowed: the transport retries crashed webhook handlers, and a
/// duplicate generation costs far more than a lost status message.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: TelegramClient,
}

impl TelegramNotifier {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, chat: ChatId, notice: Notice) {
        let text = messages::render(&notice);
        let outcome = match &notice {
            Notice::Result { photo, .. } => {
                self.client.send_photo(chat, photo.as_str(), &text).await
            }
            _ => self.client.send_message(chat, &text).await,
        };
        if let Err(e) = outcome {
            warn!("failed to deliver notice to chat {chat}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: Option<&str>, photo: Vec<PhotoSize>) -> Message {
        Message {
            chat: Chat { id: 1 },
            text: text.map(str::to_string),
            photo,
        }
    }

    fn size(file_id: &str, width: u32, height: u32) -> PhotoSize {
        PhotoSize {
            file_id: file_id.to_string(),
            width,
            height,
            file_size: None,
        }
    }

    #[test]
    fn photo_beats_text_in_classification() {
        let msg = message(Some("caption"), vec![size("a", 90, 120)]);
        assert!(matches!(classify(&msg), Some(Inbound::Photo(_))));
    }

    #[test]
    fn largest_rendition_wins() {
        let msg = message(
            None,
            vec![size("small", 90, 120), size("big", 720, 960), size("mid", 320, 480)],
        );
        match classify(&msg) {
            Some(Inbound::Photo(photo)) => assert_eq!(photo.file_id, "big"),
            other => panic!("expected photo, got {other:?}"),
        }
    }

    #[test]
    fn slash_prefix_is_a_command() {
        let msg = message(Some("/cancel"), vec![]);
        assert!(matches!(
            classify(&msg),
            Some(Inbound::Command(Command::Cancel))
        ));
    }

    #[test]
    fn plain_text_is_a_revision_candidate() {
        let msg = message(Some("  change background to red  "), vec![]);
        match classify(&msg) {
            Some(Inbound::Text(text)) => assert_eq!(text, "change background to red"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn empty_messages_are_ignored() {
        assert!(classify(&message(None, vec![])).is_none());
        assert!(classify(&message(Some("   "), vec![])).is_none());
    }
}
