//! HTTP middleware for the store.

pub mod auth;

pub use auth::{AuthRejection, RequireAuth};
