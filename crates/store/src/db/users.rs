//! User repository for database operations.
//!
//! Queries use the runtime sqlx API with explicit row types; rows are
//! converted into domain models at the repository boundary so invalid
//! stored values surface as `RepositoryError::DataCorruption`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use mercadito_core::{CartId, Email, Role, UserId};

use super::RepositoryError;
use crate::models::User;

/// Raw `users` row as stored.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    first_name: String,
    last_name: String,
    email: String,
    age: i16,
    password_hash: String,
    cart_id: Option<i32>,
    role: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: Role = self.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        Ok(User {
            id: UserId::new(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            email,
            age: self.age,
            password_hash: self.password_hash,
            cart: self.cart_id.map(CartId::new),
            role,
            created_at: self.created_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, age, password_hash, cart_id, role, created_at";

/// Fields required to insert a new user; the hash is already computed.
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a Email,
    pub age: i16,
    pub password_hash: &'a str,
    pub role: Role,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored values are invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email.as_str())
                .fetch_optional(self.pool)
                .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored values are invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: NewUser<'_>) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (first_name, last_name, email, age, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .bind(new_user.email.as_str())
        .bind(new_user.age)
        .bind(new_user.password_hash)
        .bind(new_user.role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }
}
