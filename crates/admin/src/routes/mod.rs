//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Auth
//! GET  /login                           - Login page
//! POST /login                           - Email/password login
//! POST /logout                          - Logout
//!
//! # Dashboard
//! GET  /                                - Dashboard overview
//!
//! # Categories
//! GET  /categorias                      - Category listing
//! GET  /categorias/nueva                - New category form
//! POST /categorias                      - Create category
//! GET  /categorias/{id}                 - Edit category form
//! POST /categorias/{id}                 - Update category
//! POST /categorias/{id}/toggle          - Flip active flag
//! POST /categorias/{id}/delete          - Delete (blocked while products remain)
//!
//! # Products
//! GET  /productos                       - Product listing (searchable, paged)
//! GET  /productos/nuevo                 - New product form
//! POST /productos                       - Create product
//! GET  /productos/{id}                  - Edit product form
//! POST /productos/{id}                  - Update product
//! POST /productos/{id}/toggle           - Flip active flag
//! POST /productos/{id}/delete           - Delete product and gallery
//! POST /productos/{id}/images           - Add gallery image
//! POST /productos/{id}/images/{image_id}/delete - Remove gallery image
//! ```

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the full admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .nest("/categorias", category_routes())
        .nest("/productos", product_routes())
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route("/nueva", get(categories::new))
        .route("/{id}", get(categories::edit).post(categories::update))
        .route("/{id}/toggle", post(categories::toggle))
        .route("/{id}/delete", post(categories::delete))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/nuevo", get(products::new))
        .route("/{id}", get(products::edit).post(products::update))
        .route("/{id}/toggle", post(products::toggle))
        .route("/{id}/delete", post(products::delete))
        .route("/{id}/images", post(products::add_image))
        .route("/{id}/images/{image_id}/delete", post(products::remove_image))
}
