pub mod config;
pub mod error;
pub mod types;

pub use config::{BotConfig, PhotoLimits};
pub use error::{Error, Result, ValidationError};
pub use types::{
    BotState, ChatId, Command, Event, PhotoRef, PromptParams, RevisionUpdate, Session,
};
