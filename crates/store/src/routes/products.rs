//! Product API route handlers.
//!
//! Listing supports limit/page pagination, price sorting, and category and
//! status filters; the response carries the pagination metadata clients
//! need to build pagers. Catalog writes publish a notification so connected
//! WebSocket clients re-render without polling.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mercadito_core::ProductId;

use crate::db::RepositoryError;
use crate::db::products::{NewProduct, PriceSort, ProductChanges, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::Product;
use crate::notifications::CatalogEvent;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// Request Types
// =============================================================================

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub page: Option<i64>,
    /// `asc` or `desc` (by price); anything else is ignored.
    pub sort: Option<String>,
    /// Category filter.
    pub query: Option<String>,
    /// Availability filter.
    pub status: Option<bool>,
}

/// Create-product request body. Thumbnails are the only optional field.
#[derive(Debug, Deserialize)]
pub struct CreateProductBody {
    pub title: String,
    pub description: String,
    pub code: String,
    pub price: Decimal,
    #[serde(default)]
    pub status: Option<bool>,
    pub stock: i32,
    pub category: String,
    #[serde(default)]
    pub thumbnails: Vec<String>,
}

/// Partial-update request body; absent fields keep their stored value.
/// The ID is immutable and not accepted here.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub price: Option<Decimal>,
    pub status: Option<bool>,
    pub stock: Option<i32>,
    pub category: Option<String>,
    pub thumbnails: Option<Vec<String>>,
}

// =============================================================================
// Response Types
// =============================================================================

/// Single-product response envelope.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub status: &'static str,
    pub payload: Product,
}

/// Paginated listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub status: &'static str,
    pub payload: Vec<Product>,
    pub total_pages: i64,
    pub prev_page: Option<i64>,
    pub next_page: Option<i64>,
    pub page: i64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Paginated product listing.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ProductListResponse>> {
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let page = params.page.unwrap_or(1).max(1);
    let sort = parse_sort(params.sort.as_deref());
    let category = params.query.as_deref();

    let repo = ProductRepository::new(state.pool());

    let total = repo.count(category, params.status).await?;
    let total_pages = ((total + limit - 1) / limit).max(1);

    let offset = (page - 1) * limit;
    let payload = repo
        .list(category, params.status, sort, limit, offset)
        .await?;

    let has_prev_page = page > 1;
    let has_next_page = page < total_pages;
    let prev_page = has_prev_page.then(|| page - 1);
    let next_page = has_next_page.then(|| page + 1);

    let link = |target: i64| page_link(target, limit, &params);

    Ok(Json(ProductListResponse {
        status: "success",
        payload,
        total_pages,
        prev_page,
        next_page,
        page,
        has_prev_page,
        has_next_page,
        prev_link: prev_page.map(link),
        next_link: next_page.map(link),
    }))
}

/// Product detail.
pub async fn show(
    State(state): State<AppState>,
    Path(pid): Path<ProductId>,
) -> Result<Json<ProductResponse>> {
    let product = ProductRepository::new(state.pool())
        .get(pid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {pid}")))?;

    Ok(Json(ProductResponse {
        status: "success",
        payload: product,
    }))
}

/// Create a product and notify connected clients.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProductBody>,
) -> Result<impl IntoResponse> {
    validate_fields(&body.title, &body.code, body.price, body.stock)?;

    let repo = ProductRepository::new(state.pool());
    let product = repo
        .create(NewProduct {
            title: &body.title,
            description: &body.description,
            code: &body.code,
            price: body.price,
            status: body.status.unwrap_or(true),
            stock: body.stock,
            category: &body.category,
            thumbnails: &body.thumbnails,
        })
        .await?;

    tracing::info!(product_id = %product.id, code = %product.code, "product created");

    let products = repo.all().await?;
    state.hub().publish(CatalogEvent::ProductCreated { products });

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            status: "success",
            payload: product,
        }),
    ))
}

/// Partial product update.
pub async fn update(
    State(state): State<AppState>,
    Path(pid): Path<ProductId>,
    Json(body): Json<UpdateProductBody>,
) -> Result<Json<ProductResponse>> {
    if let Some(price) = body.price
        && price < Decimal::ZERO
    {
        return Err(AppError::BadRequest("price cannot be negative".to_string()));
    }
    if let Some(stock) = body.stock
        && stock < 0
    {
        return Err(AppError::BadRequest("stock cannot be negative".to_string()));
    }

    let product = ProductRepository::new(state.pool())
        .update(
            pid,
            ProductChanges {
                title: body.title,
                description: body.description,
                code: body.code,
                price: body.price,
                status: body.status,
                stock: body.stock,
                category: body.category,
                thumbnails: body.thumbnails,
            },
        )
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(format!("product {pid}")),
            other => AppError::Database(other),
        })?;

    Ok(Json(ProductResponse {
        status: "success",
        payload: product,
    }))
}

/// Delete a product and notify connected clients.
pub async fn remove(
    State(state): State<AppState>,
    Path(pid): Path<ProductId>,
) -> Result<StatusCode> {
    let repo = ProductRepository::new(state.pool());

    if !repo.delete(pid).await? {
        return Err(AppError::NotFound(format!("product {pid}")));
    }

    tracing::info!(product_id = %pid, "product deleted");

    let products = repo.all().await?;
    state.hub().publish(CatalogEvent::ProductDeleted { products });

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse the sort parameter; unknown values mean unsorted.
fn parse_sort(sort: Option<&str>) -> Option<PriceSort> {
    match sort {
        Some("asc") => Some(PriceSort::Asc),
        Some("desc") => Some(PriceSort::Desc),
        _ => None,
    }
}

/// Build a listing link for a page, preserving the active parameters.
fn page_link(page: i64, limit: i64, params: &ListQuery) -> String {
    let mut link = format!("/api/products?limit={limit}&page={page}");
    if let Some(sort) = &params.sort {
        link.push_str(&format!("&sort={sort}"));
    }
    if let Some(query) = &params.query {
        link.push_str(&format!("&query={query}"));
    }
    if let Some(status) = params.status {
        link.push_str(&format!("&status={status}"));
    }
    link
}

fn validate_fields(title: &str, code: &str, price: Decimal, stock: i32) -> Result<()> {
    if title.trim().is_empty() {
        return Err(AppError::BadRequest("title cannot be empty".to_string()));
    }
    if code.trim().is_empty() {
        return Err(AppError::BadRequest("code cannot be empty".to_string()));
    }
    if price < Decimal::ZERO {
        return Err(AppError::BadRequest("price cannot be negative".to_string()));
    }
    if stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".to_string()));
    }
    Ok(())
}
