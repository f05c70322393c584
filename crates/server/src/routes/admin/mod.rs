//! Back office route handlers.
//!
//! Every handler takes [`RequireAdminAuth`](crate::middleware::RequireAdminAuth),
//! so anonymous calls are rejected with 401 before any data access.

pub mod analytics;
pub mod customers;
pub mod inquiries;
pub mod products;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch},
};

use crate::state::AppState;
use crate::uploads::MAX_UPLOAD_BODY_BYTES;

/// Product management routes. Bodies may carry an image upload.
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
}

/// Create all back office routes, mounted under `/api/admin`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .route("/inquiries", get(inquiries::index))
        .route("/inquiries/{id}", patch(inquiries::update_status))
        .route("/customers", get(customers::index))
        .route("/analytics", get(analytics::index))
}
