//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the store.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is a server fault worth reporting.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(err) => !matches!(
                err,
                RepositoryError::NotFound | RepositoryError::Conflict(_)
            ),
            Self::Internal(_) => true,
            Self::Auth(err) => matches!(
                err,
                AuthError::Repository(_) | AuthError::TokenSigning | AuthError::PasswordHash
            ),
            Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }
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
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::InvalidToken => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::DuplicateEmail => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::TokenSigning | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => "Not found".to_string(),
                RepositoryError::Conflict(msg) => msg.clone(),
                _ => "Internal server error".to_string(),
            },
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::InvalidToken => "Invalid or expired token".to_string(),
                AuthError::DuplicateEmail => {
                    "An account with this email already exists".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::Repository(_) | AuthError::TokenSigning | AuthError::PasswordHash => {
                    "Internal server error".to_string()
                }
            },
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::DuplicateEmail)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidToken)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::WeakPassword("x".to_string()))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_repository_error_status_codes() {
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Conflict(
                "product code already exists".to_string()
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::DataCorruption(
                "bad row".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_is_redacted() {
        let response =
            AppError::Internal("connection string leaked".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
