pub mod engine;
pub mod generate;
pub mod notify;
pub mod prompt;
pub mod validation;

pub use engine::Conversation;
pub use generate::ImageGenerator;
pub use notify::{Notice, Notifier};
pub use validation::{validate_photo, PhotoInfo};
