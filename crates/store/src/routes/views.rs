//! Server-rendered view handlers.
//!
//! Pages are rendered with askama templates; display data is preformatted
//! into small view structs so templates stay logic-free.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use mercadito_core::{CartId, ProductId};

use crate::db::carts::CartRepository;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::{Cart, Product};
use crate::state::AppState;

const PAGE_SIZE: i64 = 10;

// =============================================================================
// View Models
// =============================================================================

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub code: String,
    pub price: String,
    pub stock: i32,
    pub category: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            description: product.description.clone(),
            code: product.code.clone(),
            price: product.display_price(),
            stock: product.stock,
            category: product.category.clone(),
        }
    }
}

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub title: String,
    pub quantity: i32,
    pub price: String,
    pub line_total: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub id: String,
    pub items: Vec<CartItemView>,
    pub item_count: i64,
    pub total: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            id: cart.id.to_string(),
            items: cart
                .products
                .iter()
                .map(|item| CartItemView {
                    title: item.product.title.clone(),
                    quantity: item.quantity,
                    price: item.product.display_price(),
                    line_total: format!(
                        "${:.2}",
                        item.product.price * rust_decimal::Decimal::from(item.quantity)
                    ),
                })
                .collect(),
            item_count: cart.item_count(),
            total: cart.display_total(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Products listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub page: i64,
    pub total_pages: i64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: i64,
    pub next_page: i64,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate;

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate;

/// Live catalog page template (wired to `/ws`).
#[derive(Template, WebTemplate)]
#[template(path = "realtime_products.html")]
pub struct RealtimeProductsTemplate {
    pub products: Vec<ProductView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

/// Paginated products listing page.
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<ProductsIndexTemplate> {
    let page = query.page.unwrap_or(1).max(1);

    let repo = ProductRepository::new(state.pool());
    let total = repo.count(None, None).await?;
    let total_pages = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);

    let products = repo
        .list(None, None, None, PAGE_SIZE, (page - 1) * PAGE_SIZE)
        .await?;

    Ok(ProductsIndexTemplate {
        products: products.iter().map(ProductView::from).collect(),
        page,
        total_pages,
        has_prev_page: page > 1,
        has_next_page: page < total_pages,
        prev_page: page - 1,
        next_page: page + 1,
    })
}

/// Product detail page.
pub async fn product_detail(
    State(state): State<AppState>,
    Path(pid): Path<ProductId>,
) -> Result<ProductShowTemplate> {
    let product = ProductRepository::new(state.pool())
        .get(pid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {pid}")))?;

    Ok(ProductShowTemplate {
        product: ProductView::from(&product),
    })
}

/// Cart contents page.
pub async fn cart_detail(
    State(state): State<AppState>,
    Path(cid): Path<CartId>,
) -> Result<CartShowTemplate> {
    let cart = CartRepository::new(state.pool())
        .get(cid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cart {cid}")))?;

    Ok(CartShowTemplate {
        cart: CartView::from(&cart),
    })
}

/// Login page.
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate
}

/// Register page.
pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate
}

/// Live catalog page; the embedded script subscribes to `/ws`.
pub async fn realtime_products(State(state): State<AppState>) -> Result<RealtimeProductsTemplate> {
    let products = ProductRepository::new(state.pool()).all().await?;

    Ok(RealtimeProductsTemplate {
        products: products.iter().map(ProductView::from).collect(),
    })
}
