//! Error types for label resolution and persistence

use thiserror::Error;

/// Result type for label operations
pub type Result<T> = std::result::Result<T, LabelError>;

/// Errors that can occur while resolving or persisting labels
#[derive(Error, Debug)]
pub enum LabelError {
    /// Remote query service answered with a non-success status
    #[error("label query failed with status {status}: {message}")]
    Remote { status: u16, message: String },

    /// Remote query never produced a response (connect/timeout/body error)
    #[error("label query transport error: {0}")]
    Transport(String),

    /// IO error while loading or flushing a persisted store
    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error in a persisted store document
    #[error("store serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LabelError {
    /// Create a remote fault carrying the upstream status and message
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Create a transport fault
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}
