//! Back office account.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use velaris_core::AdminId;

/// An admin account row.
///
/// The password hash is never serialized; this type is not exposed over HTTP.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: AdminId,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
