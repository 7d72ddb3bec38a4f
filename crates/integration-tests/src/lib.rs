//! Integration tests for Mercadito.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p mercadito-cli -- migrate
//!
//! # Start the server
//! cargo run -p mercadito-store
//!
//! # Run the integration tests
//! cargo test -p mercadito-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `session_flow` - Register/login/current end-to-end
//! - `products_api` - Product CRUD and pagination
//! - `carts_api` - Cart CRUD and line-item behavior
//!
//! Tests are `#[ignore]`d by default because they require a running server
//! (`MERCADITO_BASE_URL`, default `http://localhost:8080`) and its database.
