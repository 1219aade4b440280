//! API error taxonomy
//!
//! Three client-visible classes: bad input (the entity cannot be
//! normalized), upstream faults (the knowledge base or query service
//! answered badly) and unexpected faults (rendering or serialization
//! broke mid-pipeline). Faults are never downgraded: a pipeline stage
//! either returns a fully valid structure or aborts the request.

use thiserror::Error;
use wikigraph_core::RenderError;
use wikigraph_labels::LabelError;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors surfaced by the normalization pipeline
#[derive(Error, Debug)]
pub enum ApiError {
    /// The fetched record cannot be normalized (missing required label,
    /// unknown entity id)
    #[error("bad input: {0}")]
    BadInput(String),

    /// The knowledge base rejected the entity identifier
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// The knowledge base answered with a non-success status
    #[error("upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    /// Label resolution failed
    #[error("label resolution failed: {0}")]
    Label(#[from] LabelError),

    /// A claim payload could not be rendered
    #[error("render failure: {0}")]
    Render(#[from] RenderError),

    /// Anything else that broke mid-pipeline
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Create a bad input error
    pub fn bad_input(msg: impl Into<String>) -> Self {
        Self::BadInput(msg.into())
    }

    /// Create an entity-not-found error
    pub fn entity_not_found(msg: impl Into<String>) -> Self {
        Self::EntityNotFound(msg.into())
    }

    /// Create an upstream fault carrying the remote status and message
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
