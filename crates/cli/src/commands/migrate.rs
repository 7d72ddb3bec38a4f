//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! mercadito-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `MERCADITO_DATABASE_URL` - `PostgreSQL` connection string for the store
//!   (falls back to `DATABASE_URL`)
//!
//! Migration files live in `crates/store/migrations/` and are embedded into
//! the binary at compile time.

use secrecy::ExposeSecret;
use sqlx::PgPool;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run store database migrations.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = super::database_url()
        .ok_or(MigrationError::MissingEnvVar("MERCADITO_DATABASE_URL"))?;

    tracing::info!("Connecting to store database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    tracing::info!("Running store migrations...");
    sqlx::migrate!("../store/migrations").run(&pool).await?;

    tracing::info!("Store migrations complete!");
    Ok(())
}
