//! Seam to the messaging transport.
//!
//! The engine never talks to a chat API directly; it classifies every
//! outcome into a [`Notice`] and hands it to the transport. Delivery is
//! fire-and-forget: a notifier must swallow (and log) its own failures,
//! because a crash at the transport boundary would be retried by the
//! webhook infrastructure and cause duplicate processing.

use async_trait::async_trait;

use potret_core::{ChatId, Error, PhotoRef, PromptParams, ValidationError};

/// Every user-visible outcome of handling one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// /start or /reset greeting; any previous session was discarded.
    Welcome,
    Help,
    Cancelled,
    NothingToCancel,
    /// Work has been accepted and generation is in flight.
    Processing { revision: bool },
    /// A generated photo is ready and a revision window is open.
    Result {
        photo: PhotoRef,
        params: PromptParams,
        revised: bool,
    },
    /// Revision text yielded no extractable field.
    NotUnderstood,
    /// The revision window had already closed; the session is gone.
    Expired,
    /// Text arrived with no active result to revise.
    SendPhotoFirst,
    /// The photo failed validation before reaching the state machine.
    Rejected(ValidationError),
    GenerationFailed { timed_out: bool },
    UnknownCommand(String),
    InternalError,
}

impl Notice {
    /// Map the error taxonomy onto user-visible outcomes. Every variant
    /// has a mapping, so no failure can escape the transport boundary
    /// unreported.
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::Validation(v) => Self::Rejected(v.clone()),
            Error::Ai(_) => Self::GenerationFailed { timed_out: false },
            Error::GenerationTimeout => Self::GenerationFailed { timed_out: true },
            Error::EmptyRevision => Self::NotUnderstood,
            Error::SessionExpired => Self::Expired,
            Error::NoSession => Self::SendPhotoFirst,
            Error::Internal(_) => Self::InternalError,
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn notify(&self, chat: ChatId, notice: Notice);
}
