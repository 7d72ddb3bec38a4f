//! HTTP route handlers for the store.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Products listing page
//! GET  /health                 - Health check
//!
//! # Sessions (JSON API)
//! POST /api/sessions/register  - Register a new user
//! POST /api/sessions/login     - Login, returns a bearer token
//! GET  /api/sessions/current   - The authenticated principal
//!
//! # Products (JSON API)
//! GET    /api/products         - Paginated product listing
//! POST   /api/products         - Create product
//! GET    /api/products/{pid}   - Product detail
//! PUT    /api/products/{pid}   - Partial update
//! DELETE /api/products/{pid}   - Delete product
//!
//! # Carts (JSON API)
//! POST   /api/carts                        - Create empty cart
//! GET    /api/carts/{cid}                  - Cart with populated lines
//! PUT    /api/carts/{cid}                  - Replace items wholesale
//! DELETE /api/carts/{cid}                  - Clear cart
//! POST   /api/carts/{cid}/product/{pid}    - Add one unit
//! PUT    /api/carts/{cid}/product/{pid}    - Set line quantity
//! DELETE /api/carts/{cid}/product/{pid}    - Remove line
//!
//! # Views (server-rendered)
//! GET  /products/{pid}         - Product detail page
//! GET  /carts/{cid}            - Cart page
//! GET  /login                  - Login page
//! GET  /register               - Register page
//! GET  /realtimeproducts       - Live catalog page (wired to /ws)
//!
//! # Real-time
//! GET  /ws                     - WebSocket catalog notifications
//! ```

pub mod carts;
pub mod products;
pub mod sessions;
pub mod views;
pub mod ws;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the session routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(sessions::register))
        .route("/login", post(sessions::login))
        .route("/current", get(sessions::current))
}

/// Create the product API routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{pid}",
            get(products::show)
                .put(products::update)
                .delete(products::remove),
        )
}

/// Create the cart API routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(carts::create))
        .route(
            "/{cid}",
            get(carts::show).put(carts::replace).delete(carts::clear),
        )
        .route(
            "/{cid}/product/{pid}",
            post(carts::add_product)
                .put(carts::set_quantity)
                .delete(carts::remove_product),
        )
}

/// Create the server-rendered view routes router.
pub fn view_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(views::home))
        .route("/products/{pid}", get(views::product_detail))
        .route("/carts/{cid}", get(views::cart_detail))
        .route("/login", get(views::login_page))
        .route("/register", get(views::register_page))
        .route("/realtimeproducts", get(views::realtime_products))
}

/// Create all routes for the store.
pub fn routes() -> Router<AppState> {
    Router::new()
        // JSON APIs
        .nest("/api/sessions", session_routes())
        .nest("/api/products", product_routes())
        .nest("/api/carts", cart_routes())
        // Real-time catalog notifications
        .route("/ws", get(ws::upgrade))
        // Server-rendered views
        .merge(view_routes())
}
