//! Error taxonomy for the HTTP API.
//!
//! Every handler failure is expressed as an [`ApiError`] and rendered as a
//! JSON body of the shape `{"success": false, "error": "..."}` with the
//! matching status code. Infrastructure-level rejections (oversize bodies,
//! timeouts) are produced by the middleware stack before a handler runs and
//! keep their layer-native plain-text bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Failures surfaced by API handlers, mapped onto HTTP statuses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unknown config id, missing source file, or unknown brew category.
    #[error("{0}")]
    NotFound(String),

    /// Resolved path escapes the dotfiles root.
    #[error("{0}")]
    Forbidden(String),

    /// Content failed a format gate; nothing was written.
    #[error("{0}")]
    ValidationFailed(String),

    /// Request body or parameters could not be interpreted.
    #[error("{0}")]
    MalformedRequest(String),

    /// Unexpected I/O failure while touching the filesystem.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }
        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}
