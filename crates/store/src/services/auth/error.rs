//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
///
/// Every strategy fails closed: anomalies become one of these variants and
/// the caller never sees a half-authenticated principal.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] mercadito_core::EmailError),

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Registration attempted with an email that already exists.
    #[error("email already registered")]
    DuplicateEmail,

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Bearer token failed verification (bad signature, expired, or the
    /// claimed principal no longer exists).
    #[error("invalid or expired token")]
    InvalidToken,

    /// Token could not be signed.
    #[error("token signing failed")]
    TokenSigning,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
