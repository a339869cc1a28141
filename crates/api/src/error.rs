//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers should return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;
use crate::services::auth::AuthError;
use crate::services::dairy::DairyError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Dairy operation failed.
    #[error("Dairy error: {0}")]
    Dairy(#[from] DairyError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::KeySetUnavailable(_) => StatusCode::BAD_GATEWAY,
                AuthError::TokenIssue | AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                AuthError::InvalidToken
                | AuthError::KeyNotFound
                | AuthError::MissingClaim(_)
                | AuthError::InvalidEmailClaim(_) => StatusCode::UNAUTHORIZED,
            },
            Self::Dairy(err) => match err {
                DairyError::OwnerNotFound => StatusCode::NOT_FOUND,
                DairyError::CodeSpaceExhausted | DairyError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(_) => "Internal server error".to_string(),
            Self::Auth(err) => match err {
                AuthError::KeySetUnavailable(_) => "Identity provider unavailable".to_string(),
                AuthError::TokenIssue | AuthError::Store(_) => "Internal server error".to_string(),
                // Never say why a token was rejected
                AuthError::InvalidToken
                | AuthError::KeyNotFound
                | AuthError::MissingClaim(_)
                | AuthError::InvalidEmailClaim(_) => "Invalid token".to_string(),
            },
            Self::Dairy(err) => match err {
                DairyError::OwnerNotFound => "Owner not found".to_string(),
                DairyError::CodeSpaceExhausted | DairyError::Store(_) => {
                    "Internal server error".to_string()
                }
            },
            Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Store(_) => true,
            Self::Auth(err) => matches!(
                err,
                AuthError::KeySetUnavailable(_) | AuthError::TokenIssue | AuthError::Store(_)
            ),
            Self::Dairy(err) => matches!(
                err,
                DairyError::CodeSpaceExhausted | DairyError::Store(_)
            ),
            Self::BadRequest(_) => false,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from an owner ID.
///
/// Call this after successful authentication to associate errors with owners.
pub fn set_sentry_user(owner_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(owner_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
