//! Integration tests for the session endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The store server running (cargo run -p mercadito-store)
//!
//! Run with: cargo test -p mercadito-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the store (configurable via environment).
fn base_url() -> String {
    std::env::var("MERCADITO_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// A unique email per test run so reruns don't collide.
fn unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4())
}

/// Test helper: register a user and return the response.
async fn register(client: &Client, email: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/sessions/register", base_url()))
        .json(&json!({
            "first_name": "Test",
            "last_name": "User",
            "email": email,
            "age": 30,
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to send register request")
}

/// Test helper: login and return the response.
async fn login(client: &Client, email: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/sessions/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request")
}

#[tokio::test]
#[ignore = "Requires running store server and database"]
async fn test_register_login_current_flow() {
    let client = Client::new();
    let email = unique_email();

    // Register
    let resp = register(&client, &email, "p1").await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("register body not json");
    assert_eq!(body["user"]["email"], email.as_str());
    // The principal is sanitized: no hash, no password field
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["user"]["role"], "user");

    // Login
    let resp = login(&client, &email, "p1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("login body not json");
    let token = body["token"].as_str().expect("token missing");
    assert!(!token.is_empty());
    assert_eq!(body["user"]["email"], email.as_str());

    // Current with the issued token
    let resp = client
        .get(format!("{}/api/sessions/current", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send current request");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("current body not json");
    assert_eq!(body["user"]["email"], email.as_str());
}

#[tokio::test]
#[ignore = "Requires running store server and database"]
async fn test_duplicate_registration_rejected() {
    let client = Client::new();
    let email = unique_email();

    let resp = register(&client, &email, "p1").await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Second attempt with the same email: rejected, no second record
    let resp = register(&client, &email, "another-password").await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // The original credentials still log in
    let resp = login(&client, &email, "p1").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running store server and database"]
async fn test_login_with_wrong_password_rejected() {
    let client = Client::new();
    let email = unique_email();

    let resp = register(&client, &email, "p1").await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = login(&client, &email, "wrong").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running store server and database"]
async fn test_login_unknown_email_rejected() {
    let client = Client::new();

    let resp = login(&client, &unique_email(), "p1").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running store server and database"]
async fn test_current_without_token_rejected() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/api/sessions/current", base_url()))
        .send()
        .await
        .expect("Failed to send current request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running store server and database"]
async fn test_current_with_tampered_token_rejected() {
    let client = Client::new();
    let email = unique_email();

    register(&client, &email, "p1").await;
    let resp = login(&client, &email, "p1").await;
    let body: Value = resp.json().await.expect("login body not json");
    let token = body["token"].as_str().expect("token missing");

    // Flip the final signature character
    let mut tampered = token.to_string();
    let last = tampered.pop().expect("token empty");
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let resp = client
        .get(format!("{}/api/sessions/current", base_url()))
        .bearer_auth(tampered)
        .send()
        .await
        .expect("Failed to send current request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
