//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use mercadito_core::{CartId, Email, Role, UserId};

/// A store user (domain type).
///
/// The `password_hash` field holds an Argon2id PHC string from the moment
/// the record is created; plaintext never reaches this type. `User` is
/// deliberately not `Serialize` - responses go through [`PublicUser`].
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// User's email address (unique).
    pub email: Email,
    /// Age in years.
    pub age: i16,
    /// Argon2id hash of the password.
    pub password_hash: String,
    /// The user's cart, if one has been attached.
    pub cart: Option<CartId>,
    /// Role, defaults to `user`.
    pub role: Role,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// The sanitized principal returned by the session endpoints.
///
/// There is no hash field here, so serialization can never leak one.
/// The cart reference is only populated for `/current`.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub age: i16,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart: Option<CartId>,
}

impl PublicUser {
    /// Sanitized view without the cart reference (register/login responses).
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            age: user.age,
            role: user.role,
            cart: None,
        }
    }

    /// Sanitized view including the cart reference (`/current` response).
    #[must_use]
    pub fn with_cart(user: &User) -> Self {
        Self {
            cart: user.cart,
            ..Self::from_user(user)
        }
    }
}
