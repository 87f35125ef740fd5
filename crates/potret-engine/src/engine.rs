//! The conversation state machine.
//!
//! Each inbound event is handled by one call to
//! [`Conversation::handle_event`]; there is no shared in-process state
//! across calls beyond the session store, no background work, and no
//! retry. Concurrent events for the same chat race on the store with
//! last-write-wins semantics, per the storage contract.

use chrono::Utc;
use tracing::{info, warn};

use potret_core::{BotConfig, BotState, ChatId, Command, Error, Event, PhotoRef, Result, Session};
use potret_parser::RevisionParser;
use potret_session::{RevisionWindow, SessionStore};

use crate::generate::ImageGenerator;
use crate::notify::{Notice, Notifier};

pub struct Conversation<S, G, N> {
    store: S,
    generator: G,
    notifier: N,
    parser: RevisionParser,
    window: RevisionWindow,
}

impl<S, G, N> Conversation<S, G, N>
where
    S: SessionStore,
    G: ImageGenerator,
    N: Notifier,
{
    pub fn new(config: &BotConfig, store: S, generator: G, notifier: N) -> Self {
        Self {
            store,
            generator,
            notifier,
            parser: RevisionParser::new(),
            window: RevisionWindow::new(config.revision_window),
        }
    }

    /// Handle one classified event. Cannot fail: every outcome, including
    /// internal failures, resolves to a [`Notice`] for the transport.
    pub async fn handle_event(&self, chat: ChatId, event: Event) {
        match event {
            Event::Photo { file } => self.on_photo(chat, file).await,
            Event::Text { text } => {
                if let Err(err) = self.on_text(chat, &text).await {
                    self.notifier.notify(chat, Notice::from_error(&err)).await;
                }
            }
            Event::Command(command) => self.on_command(chat, command).await,
            Event::Timeout => self.on_timeout(chat).await,
        }
    }

    /// A new photo always wins, whatever the prior state: it cancels any
    /// open revision window and overwrites both photo refs, while the
    /// prompt parameters carry over as the defaults for the new photo.
    async fn on_photo(&self, chat: ChatId, file: PhotoRef) {
        let mut session = self.store.get_or_create(chat).await;
        if session.state == BotState::WaitingRevision {
            info!("new photo for chat {chat} cancels the open revision window");
        }
        session.state = BotState::Processing;
        session.original_photo_ref = Some(file);
        session.processed_photo_ref = None;
        session.revision_deadline = None;
        self.store.put(&mut session).await;

        self.notifier
            .notify(chat, Notice::Processing { revision: false })
            .await;
        self.run_generation(session, false).await;
    }

    async fn on_text(&self, chat: ChatId, text: &str) -> Result<()> {
        let Some(mut session) = self.store.get(chat).await else {
            return Err(Error::NoSession);
        };
        match session.state {
            BotState::WaitingRevision => {}
            BotState::Idle | BotState::Processing | BotState::Error => {
                return Err(Error::NoSession);
            }
        }

        // Expiry is checked before parsing: a late message is rejected
        // even when it would have parsed cleanly.
        let expired = match session.revision_deadline {
            Some(deadline) => self.window.is_expired(deadline, Utc::now()),
            // WaitingRevision without a deadline breaks the session
            // invariant; the record is stale, treat it as expired.
            None => true,
        };
        if expired {
            self.store.remove(chat).await;
            return Err(Error::SessionExpired);
        }

        let update = self.parser.parse(text);
        if !update.is_valid() {
            return Err(Error::EmptyRevision);
        }

        session.prompt_parameters.merge(&update);
        session.state = BotState::Processing;
        session.revision_deadline = None;
        self.store.put(&mut session).await;

        self.notifier
            .notify(chat, Notice::Processing { revision: true })
            .await;
        self.run_generation(session, true).await;
        Ok(())
    }

    async fn on_command(&self, chat: ChatId, command: Command) {
        let notice = match command {
            Command::Start => {
                self.store.remove(chat).await;
                Notice::Welcome
            }
            Command::Help => Notice::Help,
            Command::Cancel => match self.store.get(chat).await {
                Some(session) if session.state != BotState::Idle => {
                    self.store.remove(chat).await;
                    Notice::Cancelled
                }
                _ => Notice::NothingToCancel,
            },
            Command::Unknown(name) => Notice::UnknownCommand(name),
        };
        self.notifier.notify(chat, notice).await;
    }

    /// Lazy deadline probe. Destroys the session only when its window has
    /// actually passed; otherwise a no-op.
    async fn on_timeout(&self, chat: ChatId) {
        let Some(session) = self.store.get(chat).await else {
            return;
        };
        if session.state != BotState::WaitingRevision {
            return;
        }
        let expired = session
            .revision_deadline
            .map_or(true, |deadline| self.window.is_expired(deadline, Utc::now()));
        if expired {
            self.store.remove(chat).await;
            self.notifier.notify(chat, Notice::Expired).await;
        }
    }

    /// One generation attempt from the stored original photo. Success
    /// opens a fresh revision window; failure parks the session in Error,
    /// which the next photo (or /start) clears.
    async fn run_generation(&self, mut session: Session, revised: bool) {
        let chat = session.id;
        let Some(original) = session.original_photo_ref.clone() else {
            warn!("chat {chat} entered processing without an original photo");
            session.state = BotState::Error;
            self.store.put(&mut session).await;
            self.notifier.notify(chat, Notice::InternalError).await;
            return;
        };

        match self
            .generator
            .generate(&original, &session.prompt_parameters)
            .await
        {
            Ok(output) => {
                session.processed_photo_ref = Some(output.clone());
                session.state = BotState::WaitingRevision;
                session.revision_deadline = Some(self.window.deadline_after(Utc::now()));
                self.store.put(&mut session).await;
                self.notifier
                    .notify(
                        chat,
                        Notice::Result {
                            photo: output,
                            params: session.prompt_parameters.clone(),
                            revised,
                        },
                    )
                    .await;
            }
            Err(err) => {
                warn!("generation failed for chat {chat}: {err}");
                session.state = BotState::Error;
                session.revision_deadline = None;
                self.store.put(&mut session).await;
                self.notifier.notify(chat, Notice::from_error(&err)).await;
            }
        }
    }
}
