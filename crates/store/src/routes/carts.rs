//! Cart API route handlers.
//!
//! Every mutating endpoint responds with the refreshed cart so clients
//! don't need a follow-up fetch. Unknown carts and products are 404s.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use mercadito_core::{CartId, ProductId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::error::{AppError, Result};
use crate::models::Cart;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// One replacement line for `PUT /api/carts/{cid}`.
#[derive(Debug, Deserialize)]
pub struct ReplacementItem {
    pub product: ProductId,
    pub quantity: i32,
}

/// Body for `PUT /api/carts/{cid}/product/{pid}`.
#[derive(Debug, Deserialize)]
pub struct QuantityBody {
    pub quantity: i32,
}

// =============================================================================
// Response Types
// =============================================================================

/// Cart response envelope.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub status: &'static str,
    pub payload: Cart,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a new empty cart.
pub async fn create(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let cart = CartRepository::new(state.pool()).create().await?;

    tracing::info!(cart_id = %cart.id, "cart created");

    Ok((
        StatusCode::CREATED,
        Json(CartResponse {
            status: "success",
            payload: cart,
        }),
    ))
}

/// Cart detail with populated product lines.
pub async fn show(
    State(state): State<AppState>,
    Path(cid): Path<CartId>,
) -> Result<Json<CartResponse>> {
    let cart = fetch_cart(&state, cid).await?;

    Ok(Json(CartResponse {
        status: "success",
        payload: cart,
    }))
}

/// Add one unit of a product to a cart; existing lines increment.
pub async fn add_product(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(CartId, ProductId)>,
) -> Result<Json<CartResponse>> {
    let repo = CartRepository::new(state.pool());

    repo.add_product(cid, pid, 1).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::NotFound(format!("cart {cid} or product {pid}")),
        other => AppError::Database(other),
    })?;

    let cart = fetch_cart(&state, cid).await?;

    Ok(Json(CartResponse {
        status: "success",
        payload: cart,
    }))
}

/// Replace a cart's items wholesale.
pub async fn replace(
    State(state): State<AppState>,
    Path(cid): Path<CartId>,
    Json(items): Json<Vec<ReplacementItem>>,
) -> Result<Json<CartResponse>> {
    if items.iter().any(|item| item.quantity <= 0) {
        return Err(AppError::BadRequest(
            "quantity must be positive".to_string(),
        ));
    }

    let repo = CartRepository::new(state.pool());

    if !repo.exists(cid).await? {
        return Err(AppError::NotFound(format!("cart {cid}")));
    }

    let lines: Vec<(ProductId, i32)> = items
        .iter()
        .map(|item| (item.product, item.quantity))
        .collect();

    repo.replace_items(cid, &lines).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::NotFound("unknown product in items".to_string()),
        other => AppError::Database(other),
    })?;

    let cart = fetch_cart(&state, cid).await?;

    Ok(Json(CartResponse {
        status: "success",
        payload: cart,
    }))
}

/// Set the quantity of an existing cart line.
pub async fn set_quantity(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(CartId, ProductId)>,
    Json(body): Json<QuantityBody>,
) -> Result<Json<CartResponse>> {
    if body.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be positive".to_string(),
        ));
    }

    let repo = CartRepository::new(state.pool());

    repo.set_quantity(cid, pid, body.quantity)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => {
                AppError::NotFound(format!("product {pid} not in cart {cid}"))
            }
            other => AppError::Database(other),
        })?;

    let cart = fetch_cart(&state, cid).await?;

    Ok(Json(CartResponse {
        status: "success",
        payload: cart,
    }))
}

/// Remove a product line from a cart.
pub async fn remove_product(
    State(state): State<AppState>,
    Path((cid, pid)): Path<(CartId, ProductId)>,
) -> Result<Json<CartResponse>> {
    let repo = CartRepository::new(state.pool());

    if !repo.remove_product(cid, pid).await? {
        return Err(AppError::NotFound(format!(
            "product {pid} not in cart {cid}"
        )));
    }

    let cart = fetch_cart(&state, cid).await?;

    Ok(Json(CartResponse {
        status: "success",
        payload: cart,
    }))
}

/// Remove every line from a cart.
pub async fn clear(
    State(state): State<AppState>,
    Path(cid): Path<CartId>,
) -> Result<Json<CartResponse>> {
    let repo = CartRepository::new(state.pool());

    repo.clear(cid).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::NotFound(format!("cart {cid}")),
        other => AppError::Database(other),
    })?;

    let cart = fetch_cart(&state, cid).await?;

    Ok(Json(CartResponse {
        status: "success",
        payload: cart,
    }))
}

/// Load a cart or 404.
async fn fetch_cart(state: &AppState, cid: CartId) -> Result<Cart> {
    CartRepository::new(state.pool())
        .get(cid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cart {cid}")))
}
