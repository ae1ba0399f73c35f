//! HTTP error mapping

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errors a handler can return
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed body or missing required field
    #[error("{0}")]
    BadRequest(String),

    /// Missing or wrong admin password
    #[error("Unauthorized")]
    Unauthorized,

    /// Registration with an email that is already stored
    #[error("Email already registered")]
    DuplicateEmail,

    /// A document store call failed
    #[error("{context}: {source}")]
    Store {
        /// What the handler was doing
        context: &'static str,
        /// Store failure
        #[source]
        source: eventdesk_core::Error,
    },

    /// A blocking task panicked or was cancelled
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::Store { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid request: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
