//! Public product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use velaris_core::{ProductId, parse_flag};

use super::parse_id;
use crate::error::AppError;
use crate::middleware::OptionalAdminAuth;
use crate::models::{Product, ProductFilter};
use crate::services::CatalogService;
use crate::state::AppState;

/// Query parameters for the product listing.
///
/// Flags are kept as raw text and read with the shared flag parser, so
/// `featured=on` and `featured=1` behave the same.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub featured: Option<String>,
    #[serde(rename = "includeHidden")]
    pub include_hidden: Option<String>,
}

impl ListQuery {
    /// Resolve into a repository filter. Hidden products are only reachable
    /// by an authenticated admin who asks for them.
    fn into_filter(self, is_admin: bool) -> ProductFilter {
        let flag = |raw: Option<&String>| raw.and_then(|v| parse_flag(v)) == Some(true);

        ProductFilter {
            featured_only: flag(self.featured.as_ref()),
            include_hidden: is_admin && flag(self.include_hidden.as_ref()),
            category: self
                .category
                .map(|c| c.trim().to_owned())
                .filter(|c| !c.is_empty()),
        }
    }
}

/// List products, newest first.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAdminAuth(admin): OptionalAdminAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let filter = query.into_filter(admin.is_some());
    let products = CatalogService::new(state.pool(), state.images())
        .list(&filter)
        .await?;
    Ok(Json(products))
}

/// Show a product by ID.
#[instrument(skip(state, admin))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAdminAuth(admin): OptionalAdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let id: ProductId = parse_id(&id, "Product")?;
    let product = CatalogService::new(state.pool(), state.images())
        .get_by_id(id, admin.is_some())
        .await?;
    Ok(Json(product))
}

/// Show a product by slug.
#[instrument(skip(state, admin))]
pub async fn show_by_slug(
    State(state): State<AppState>,
    OptionalAdminAuth(admin): OptionalAdminAuth,
    Path(slug): Path<String>,
) -> Result<Json<Product>, AppError> {
    let product = CatalogService::new(state.pool(), state.images())
        .get_by_slug(&slug, admin.is_some())
        .await?;
    Ok(Json(product))
}
