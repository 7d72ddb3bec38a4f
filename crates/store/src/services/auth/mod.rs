//! Authentication service.
//!
//! The three authentication strategies - register, login, and bearer-token
//! verification - are a closed set of [`Credentials`] variants dispatched
//! through a single [`AuthService::authenticate`] entry point. Every variant
//! fails closed: any anomaly becomes a typed [`AuthError`] and unexpected
//! store failures propagate to the caller.

mod error;
mod hasher;
mod token;

pub use error::AuthError;
pub use hasher::PasswordHasher;
pub use token::{Claims, TokenIssuer};

use sqlx::PgPool;

use mercadito_core::{Email, Role};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::User;

/// Input for the registration strategy.
#[derive(Debug)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: i16,
    pub password: String,
    /// Defaults to [`Role::User`] when absent.
    pub role: Option<Role>,
}

/// The closed set of credentials the service can authenticate.
#[derive(Debug)]
pub enum Credentials {
    /// Create a new principal from profile fields and a password.
    Register(Registration),
    /// Authenticate an existing principal by email and password.
    Login { email: String, password: String },
    /// Authenticate via a signed bearer token.
    Bearer { token: String },
}

/// Authentication service.
///
/// Owns the strategy bodies; hashing and token mechanics are delegated to
/// [`PasswordHasher`] and [`TokenIssuer`].
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    hasher: &'a PasswordHasher,
    issuer: &'a TokenIssuer,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, hasher: &'a PasswordHasher, issuer: &'a TokenIssuer) -> Self {
        Self {
            users: UserRepository::new(pool),
            hasher,
            issuer,
        }
    }

    /// Run the strategy matching the given credentials.
    ///
    /// # Errors
    ///
    /// Returns the strategy's rejection as [`AuthError`]; store failures
    /// surface as `AuthError::Repository`.
    pub async fn authenticate(&self, credentials: Credentials) -> Result<User, AuthError> {
        match credentials {
            Credentials::Register(registration) => self.register(registration).await,
            Credentials::Login { email, password } => self.login(&email, &password).await,
            Credentials::Bearer { token } => self.verify_bearer(&token).await,
        }
    }

    /// Issue a bearer token for an authenticated principal.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenSigning` if signing fails.
    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        self.issuer.issue(user)
    }

    /// Registration strategy: reject duplicates, hash, create.
    async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        let email = Email::parse(&registration.email)?;
        validate_password(&registration.password)?;

        // Look up by email first; the unique constraint backstops the race.
        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(&registration.password)?;

        let user = self
            .users
            .create(NewUser {
                first_name: &registration.first_name,
                last_name: &registration.last_name,
                email: &email,
                age: registration.age,
                password_hash: &password_hash,
                role: registration.role.unwrap_or_default(),
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::DuplicateEmail,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login strategy: look up, verify hash, return principal.
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        // A malformed email can't match a stored account; same rejection as
        // a wrong password to avoid account enumeration.
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Bearer strategy: verify signature/expiry, then load the principal.
    async fn verify_bearer(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.issuer.verify(token)?;

        let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;

        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }
}

/// Validate password meets requirements.
///
/// Hashing is only defined over non-empty secrets; anything else is accepted.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::WeakPassword(
            "password cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_empty_rejected() {
        let err = validate_password("").unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
    }

    #[test]
    fn test_validate_password_short_accepted() {
        assert!(validate_password("p1").is_ok());
    }
}
