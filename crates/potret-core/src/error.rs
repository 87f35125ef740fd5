use thiserror::Error;

/// Reasons a photo is refused before the conversation engine sees it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("file too large: {size} bytes (max {max})")]
    FileTooLarge { size: u64, max: u64 },

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("image too small: {width}x{height} (min {min}px)")]
    ImageTooSmall { width: u32, height: u32, min: u32 },

    #[error("no face detected")]
    NoFaceDetected,

    #[error("more than one face detected")]
    MultipleFaces,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("image generation failed: {0}")]
    Ai(String),

    #[error("image generation timed out")]
    GenerationTimeout,

    #[error("revision contained no recognizable change")]
    EmptyRevision,

    #[error("revision window expired")]
    SessionExpired,

    #[error("no active session")]
    NoSession,

    #[error("{0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
