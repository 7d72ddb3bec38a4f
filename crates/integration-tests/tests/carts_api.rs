//! Integration tests for the cart API.
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

/// Test helper: create an empty cart and return its id.
async fn create_cart(client: &Client) -> i64 {
    let resp = client
        .post(format!("{}/api/carts", base_url()))
        .send()
        .await
        .expect("Failed to create cart");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("cart body not json");
    body["payload"]["id"].as_i64().expect("cart id missing")
}

/// Test helper: create a product and return its id.
async fn create_product(client: &Client) -> i64 {
    let resp = client
        .post(format!("{}/api/products", base_url()))
        .json(&json!({
            "title": "Producto para carrito",
            "description": "Creado por los tests de integración",
            "code": format!("CART-{}", Uuid::new_v4()),
            "price": "3.00",
            "stock": 10,
            "category": "tests",
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("product body not json");
    body["payload"]["id"].as_i64().expect("product id missing")
}

/// The quantity of `pid` in the cart payload, if the line exists.
fn line_quantity(cart: &Value, pid: i64) -> Option<i64> {
    cart["products"]
        .as_array()?
        .iter()
        .find(|line| line["product"]["id"].as_i64() == Some(pid))?["quantity"]
        .as_i64()
}

#[tokio::test]
#[ignore = "Requires running store server and database"]
async fn test_add_product_twice_increments_quantity() {
    let client = Client::new();
    let cid = create_cart(&client).await;
    let pid = create_product(&client).await;

    let url = format!("{}/api/carts/{cid}/product/{pid}", base_url());

    let resp = client.post(&url).send().await.expect("Failed to add");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("cart body not json");
    assert_eq!(line_quantity(&body["payload"], pid), Some(1));

    // Same product again: the line upserts to quantity 2
    let resp = client.post(&url).send().await.expect("Failed to add");
    let body: Value = resp.json().await.expect("cart body not json");
    assert_eq!(line_quantity(&body["payload"], pid), Some(2));
    assert_eq!(body["payload"]["products"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore = "Requires running store server and database"]
async fn test_set_quantity_and_remove_line() {
    let client = Client::new();
    let cid = create_cart(&client).await;
    let pid = create_product(&client).await;

    let line_url = format!("{}/api/carts/{cid}/product/{pid}", base_url());

    client.post(&line_url).send().await.expect("Failed to add");

    // Set quantity
    let resp = client
        .put(&line_url)
        .json(&json!({ "quantity": 5 }))
        .send()
        .await
        .expect("Failed to set quantity");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("cart body not json");
    assert_eq!(line_quantity(&body["payload"], pid), Some(5));

    // Zero or negative quantities are rejected
    let resp = client
        .put(&line_url)
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("Failed to set quantity");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Remove the line
    let resp = client
        .delete(&line_url)
        .send()
        .await
        .expect("Failed to remove line");
    assert_eq!(resp.status(), StatusCode::OK);

    // Removing again: line no longer exists
    let resp = client
        .delete(&line_url)
        .send()
        .await
        .expect("Failed to remove line");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running store server and database"]
async fn test_replace_and_clear_cart() {
    let client = Client::new();
    let cid = create_cart(&client).await;
    let first = create_product(&client).await;
    let second = create_product(&client).await;

    // Replace wholesale
    let resp = client
        .put(format!("{}/api/carts/{cid}", base_url()))
        .json(&json!([
            { "product": first, "quantity": 2 },
            { "product": second, "quantity": 3 },
        ]))
        .send()
        .await
        .expect("Failed to replace items");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("cart body not json");
    assert_eq!(body["payload"]["products"].as_array().map(Vec::len), Some(2));
    assert_eq!(line_quantity(&body["payload"], first), Some(2));
    assert_eq!(line_quantity(&body["payload"], second), Some(3));

    // Clear
    let resp = client
        .delete(format!("{}/api/carts/{cid}", base_url()))
        .send()
        .await
        .expect("Failed to clear cart");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("cart body not json");
    assert_eq!(body["payload"]["products"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running store server and database"]
async fn test_unknown_cart_and_product_are_not_found() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/api/carts/999999999", base_url()))
        .send()
        .await
        .expect("Failed to get cart");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let cid = create_cart(&client).await;
    let resp = client
        .post(format!("{}/api/carts/{cid}/product/999999999", base_url()))
        .send()
        .await
        .expect("Failed to add unknown product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
