//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the response is built; the client only ever sees
//! `{"success": false, "error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use perkpass_core::{ModerationError, SubmissionError};
use serde_json::json;
use thiserror::Error;

use crate::storage::StorageError;

/// Application-level error type for the PerkPass service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Blob storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A review or delete could not be applied.
    #[error("{0}")]
    Moderation(#[from] ModerationError),

    /// A coupon submission was incomplete.
    #[error("{0}")]
    Submission(#[from] SubmissionError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Moderation(err) => match err {
                ModerationError::NotPending(_) => StatusCode::CONFLICT,
                ModerationError::NotFound(_) => StatusCode::NOT_FOUND,
                ModerationError::NotOwner { .. } => StatusCode::FORBIDDEN,
            },
            Self::Submission(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Storage(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Storage(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after a login.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
