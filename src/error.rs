//! Error type shared by both route groups and its HTTP mapping.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection checkout or query failure on a read path.
    #[error("{0}")]
    Query(#[source] sqlx::Error),

    /// Connection checkout, insert or commit failure on a write path.
    #[error("Server error: {0}")]
    Write(#[source] sqlx::Error),

    /// Write body that is not JSON or lacks a required key.
    #[error("Server error: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Invalid path")]
    InvalidPath,

    #[error("Unsupported method ('{0}')")]
    UnsupportedMethod(Method),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Query(_) | ApiError::Write(_) | ApiError::InvalidPayload(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::InvalidPath => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMethod(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }

        (status, self.to_string()).into_response()
    }
}

/// Handler result type.
pub type Result<T> = std::result::Result<T, ApiError>;
