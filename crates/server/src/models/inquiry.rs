//! Inquiries submitted through the contact form.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use velaris_core::{InquiryId, ProductId};

/// An inquiry row.
///
/// Only `status` changes after insert. `product_name` is a snapshot taken
/// at submission and survives deletion of the product.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Inquiry {
    pub id: InquiryId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
    pub product_id: Option<ProductId>,
    pub product_name: Option<String>,
    /// Stored as free text; see [`velaris_core::InquiryStatus`] for known values.
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// An inquiry joined with its product's current category.
///
/// `product_category` is `None` for general inquiries and for products
/// that have since been deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InquiryWithCategory {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub inquiry: Inquiry,
    pub product_category: Option<String>,
}

/// Validated data for a new inquiry.
#[derive(Debug, Clone)]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
    pub product_id: Option<ProductId>,
    pub product_name: Option<String>,
}
