//! Product management handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::instrument;

use velaris_core::ProductId;

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::{Product, ProductFilter};
use crate::routes::extract::ProductPayload;
use crate::routes::parse_id;
use crate::services::CatalogService;
use crate::state::AppState;

/// List every product, hidden ones included.
#[instrument(skip(admin, state), fields(admin = %admin.username))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = CatalogService::new(state.pool(), state.images())
        .list(&ProductFilter::all())
        .await?;
    Ok(Json(products))
}

/// Show a product regardless of visibility.
#[instrument(skip(admin, state), fields(admin = %admin.username))]
pub async fn show(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let id: ProductId = parse_id(&id, "Product")?;
    let product = CatalogService::new(state.pool(), state.images())
        .get_by_id(id, true)
        .await?;
    Ok(Json(product))
}

/// Create a product.
#[instrument(skip(admin, state, payload), fields(admin = %admin.username))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    payload: ProductPayload,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = CatalogService::new(state.pool(), state.images())
        .create(&payload.input, payload.image.as_ref())
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product. Omitted fields keep their values.
#[instrument(skip(admin, state, payload), fields(admin = %admin.username))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: ProductPayload,
) -> Result<Json<Product>, AppError> {
    let id: ProductId = parse_id(&id, "Product")?;
    let product = CatalogService::new(state.pool(), state.images())
        .update(id, &payload.input, payload.image.as_ref())
        .await?;
    Ok(Json(product))
}

/// Delete a product. Inquiries about it keep their snapshot.
#[instrument(skip(admin, state), fields(admin = %admin.username))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id: ProductId = parse_id(&id, "Product")?;
    CatalogService::new(state.pool(), state.images())
        .delete(id)
        .await?;
    Ok(Json(json!({ "ok": true })))
}
