//! Catalog products.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use velaris_core::ProductId;

/// A product row.
///
/// `image_url` is what the site displays (an uploaded file's public path or
/// an external URL, possibly empty). `image_path` is the public path of the
/// last local upload, if any.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: String,
    pub materials: String,
    pub craftsmanship: String,
    pub image_url: String,
    pub image_path: Option<String>,
    pub featured: bool,
    pub stock: i64,
    pub is_available: bool,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully resolved fields for a product insert.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: String,
    pub materials: String,
    pub craftsmanship: String,
    pub image_url: String,
    pub image_path: Option<String>,
    pub featured: bool,
    pub stock: i64,
    pub is_available: bool,
    pub is_visible: bool,
}

/// Full replacement row for an update, computed from the existing product
/// and the submitted changes.
#[derive(Debug, Clone)]
pub struct ProductChanges {
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: String,
    pub materials: String,
    pub craftsmanship: String,
    pub image_url: String,
    pub image_path: Option<String>,
    pub featured: bool,
    pub stock: i64,
    pub is_available: bool,
    pub is_visible: bool,
}

impl ProductChanges {
    /// Start from the product's current values.
    #[must_use]
    pub fn from_existing(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            slug: product.slug.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            materials: product.materials.clone(),
            craftsmanship: product.craftsmanship.clone(),
            image_url: product.image_url.clone(),
            image_path: product.image_path.clone(),
            featured: product.featured,
            stock: product.stock,
            is_available: product.is_available,
            is_visible: product.is_visible,
        }
    }
}

/// Listing filter.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Only featured products.
    pub featured_only: bool,
    /// Include products with `is_visible = false`.
    pub include_hidden: bool,
}

impl ProductFilter {
    /// Everything, hidden products included (back office listing).
    #[must_use]
    pub const fn all() -> Self {
        Self {
            category: None,
            featured_only: false,
            include_hidden: true,
        }
    }
}
