//! Telegram formal-photo bot binary.
//!
//! Wires the conversation engine to its collaborators: the Telegram
//! long-poll transport, the OpenRouter image generator, and one of the
//! two session store backends.

mod messages;
mod openrouter;
mod telegram;

use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use potret_core::{BotConfig, ChatId, Event, PhotoLimits, PhotoRef, PromptParams};
use potret_engine::{validate_photo, Conversation, Notice, Notifier, PhotoInfo};
use potret_session::{MemorySessionStore, RedisSessionStore, SessionStore};

use crate::openrouter::OpenRouterGenerator;
use crate::telegram::{Inbound, PhotoSize, TelegramClient, TelegramNotifier};

#[derive(Parser, Debug)]
#[command(name = "potret-bot", about = "Telegram formal-photo bot")]
struct Cli {
    /// Telegram bot token.
    #[arg(long, env = "TELEGRAM_BOT_TOKEN")]
    telegram_token: String,

    /// OpenRouter API key.
    #[arg(long, env = "OPENROUTER_API_KEY")]
    openrouter_key: String,

    /// Model routed for image-to-image generation.
    #[arg(long, env = "AI_MODEL", default_value = "google/imagen-3")]
    model: String,

    /// Redis connection URL. When absent, sessions live in process memory
    /// and are lost on restart.
    #[arg(long, env = "REDIS_URL")]
    redis_url: Option<String>,

    /// Seconds after a delivered result during which revisions are accepted.
    #[arg(long, env = "REVISION_TIMEOUT_SECS", default_value_t = 60)]
    revision_timeout_secs: u64,

    /// Sliding session TTL in seconds.
    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = 21_600)]
    session_ttl_secs: u64,

    /// Ceiling on a single generation call, in seconds.
    #[arg(long, env = "GENERATION_TIMEOUT_SECS", default_value_t = 120)]
    generation_timeout_secs: u64,

    /// Long-poll timeout passed to getUpdates.
    #[arg(long, env = "POLL_TIMEOUT_SECS", default_value_t = 30)]
    poll_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("potret=info")),
        )
        .init();

    let config = BotConfig::new(
        PromptParams::default(),
        Duration::from_secs(cli.revision_timeout_secs),
        Duration::from_secs(cli.session_ttl_secs),
        Duration::from_secs(cli.generation_timeout_secs),
        PhotoLimits::default(),
    )?;

    let client = TelegramClient::new(&cli.telegram_token);
    let notifier = TelegramNotifier::new(client.clone());
    let generator =
        OpenRouterGenerator::new(cli.openrouter_key, cli.model, config.generation_timeout);

    match cli.redis_url {
        Some(url) => {
            let store =
                RedisSessionStore::new(&url, config.session_ttl, config.defaults.clone()).await?;
            info!("session store: redis");
            let engine = Conversation::new(&config, store, generator, notifier.clone());
            run(engine, client, notifier, config, cli.poll_timeout_secs).await
        }
        None => {
            let store = MemorySessionStore::new(config.session_ttl, config.defaults.clone());
            warn!("session store: in-memory, sessions will not survive a restart");
            let engine = Conversation::new(&config, store, generator, notifier.clone());
            run(engine, client, notifier, config, cli.poll_timeout_secs).await
        }
    }
}

async fn run<S: SessionStore>(
    engine: Conversation<S, OpenRouterGenerator, TelegramNotifier>,
    client: TelegramClient,
    notifier: TelegramNotifier,
    config: BotConfig,
    poll_timeout_secs: u64,
) -> anyhow::Result<()> {
    info!("polling for updates");
    let mut offset = 0i64;
    loop {
        let updates = match client.get_updates(offset, poll_timeout_secs).await {
            Ok(updates) => updates,
            Err(e) => {
                warn!("getUpdates failed: {e}");
                tokio::time::sleep(Duration::from_secs(5)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let Some(message) = update.message else {
                continue;
            };
            let chat = message.chat.id;
            let Some(inbound) = telegram::classify(&message) else {
                continue;
            };
            match inbound {
                Inbound::Photo(photo) => {
                    handle_photo(&engine, &client, &notifier, &config, chat, photo).await;
                }
                Inbound::Text(text) => engine.handle_event(chat, Event::Text { text }).await,
                Inbound::Command(command) => {
                    engine.handle_event(chat, Event::Command(command)).await;
                }
            }
        }
    }
}

/// Resolve the Telegram file, validate it, and only then let the photo
/// reach the state machine. A rejected photo leaves the session as it was.
async fn handle_photo<S: SessionStore>(
    engine: &Conversation<S, OpenRouterGenerator, TelegramNotifier>,
    client: &TelegramClient,
    notifier: &TelegramNotifier,
    config: &BotConfig,
    chat: ChatId,
    photo: PhotoSize,
) {
    let file = match client.get_file(&photo.file_id).await {
        Ok(file) => file,
        Err(e) => {
            warn!("getFile failed for chat {chat}: {e}");
            notifier.notify(chat, Notice::InternalError).await;
            return;
        }
    };
    let Some(path) = file.file_path else {
        warn!("getFile returned no path for chat {chat}");
        notifier.notify(chat, Notice::InternalError).await;
        return;
    };

    let info = PhotoInfo {
        file_size: file.file_size.or(photo.file_size).unwrap_or(0),
        // Telegram re-encodes photo uploads as JPEG.
        mime_type: "image/jpeg".to_string(),
        width: Some(photo.width),
        height: Some(photo.height),
    };
    if let Err(err) = validate_photo(&info, &config.limits) {
        notifier.notify(chat, Notice::Rejected(err)).await;
        return;
    }

    let file = PhotoRef::from(client.file_url(&path));
    engine.handle_event(chat, Event::Photo { file }).await;
}
