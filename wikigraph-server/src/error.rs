//! Server error types with HTTP status code mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use wikigraph_api::ApiError;
use wikigraph_labels::LabelError;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Server error type that wraps API errors and provides HTTP status mapping
#[derive(Error, Debug)]
pub enum ServerError {
    /// API layer error
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Generic bad request error
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Startup/configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServerError {
    /// Map error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 - Bad Request (client errors)
            ServerError::Api(ApiError::BadInput(_)) => StatusCode::BAD_REQUEST,
            ServerError::Api(ApiError::EntityNotFound(_)) => StatusCode::BAD_REQUEST,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,

            // 502 - upstream faults, surfaced without retry
            ServerError::Api(ApiError::Upstream { .. }) => StatusCode::BAD_GATEWAY,
            ServerError::Api(ApiError::Label(LabelError::Remote { .. })) => StatusCode::BAD_GATEWAY,
            ServerError::Api(ApiError::Label(LabelError::Transport(_))) => StatusCode::BAD_GATEWAY,

            // 500 - everything that broke mid-pipeline
            ServerError::Api(ApiError::Label(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Api(ApiError::Render(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Api(ApiError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Create a bad request error
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ServerError::BadRequest(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        ServerError::Config(msg.into())
    }
}

impl From<LabelError> for ServerError {
    fn from(e: LabelError) -> Self {
        ServerError::Api(ApiError::Label(e))
    }
}

/// JSON error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// HTTP status code
    pub status: u16,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            status: status.as_u16(),
        };

        let json = serde_json::to_string(&body).unwrap_or_else(|_| {
            format!(r#"{{"error":"{}","status":{}}}"#, self, status.as_u16())
        });

        (status, [("content-type", "application/json")], json).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ServerError::Api(ApiError::bad_input("no label")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::Api(ApiError::upstream(503, "down")).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ServerError::Api(ApiError::Label(LabelError::remote(500, "boom"))).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ServerError::Api(ApiError::internal("oops")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
