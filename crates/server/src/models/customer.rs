//! Customer contacts derived from inquiries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use velaris_core::CustomerId;

/// A customer row.
///
/// Matched by email or phone on each inquiry; the matched row takes the
/// latest name, email and phone.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_inquiry_at: DateTime<Utc>,
}
