//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StoreConfig;
use crate::notifications::NotificationHub;
use crate::services::auth::{AuthError, PasswordHasher, TokenIssuer};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool, the password hasher, the
/// token issuer, and the notification hub.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StoreConfig,
    pool: PgPool,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
    hub: NotificationHub,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The hasher and token issuer are built here from configuration, so
    /// the signing secret and work factors are injected exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error if the hashing parameters are invalid.
    pub fn new(config: StoreConfig, pool: PgPool) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::new(&config.auth)?;
        let issuer = TokenIssuer::new(&config.auth.jwt_secret, config.auth.token_ttl_hours);
        let hub = NotificationHub::new();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                hasher,
                issuer,
                hub,
            }),
        })
    }

    /// Get a reference to the store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the password hasher.
    #[must_use]
    pub fn hasher(&self) -> &PasswordHasher {
        &self.inner.hasher
    }

    /// Get a reference to the token issuer.
    #[must_use]
    pub fn issuer(&self) -> &TokenIssuer {
        &self.inner.issuer
    }

    /// Get a reference to the notification hub.
    #[must_use]
    pub fn hub(&self) -> &NotificationHub {
        &self.inner.hub
    }
}
