use thiserror::Error;

use crate::logging::LoggingError;

/// Unified result type for the card grid crate.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors surfaced outside of interactive gestures.
///
/// Pointer gestures never produce these; they degrade into
/// [`NoopReason`](crate::interaction::NoopReason) outcomes instead.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),
    #[error("template `{0}` not found in palette")]
    UnknownTemplate(String),
    #[error("card `{0}` not found")]
    CardNotFound(String),
    #[error("card `{0}` appears more than once")]
    DuplicateCard(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
