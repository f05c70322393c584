//! Inquiry repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use velaris_core::{InquiryId, InquiryStatus};

use super::RepositoryError;
use crate::models::{Inquiry, InquiryWithCategory, NewInquiry};

const INQUIRY_COLUMNS: &str =
    "id, name, email, phone, message, product_id, product_name, status, created_at";

/// Repository for inquiry operations.
pub struct InquiryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> InquiryRepository<'a> {
    /// Create a new inquiry repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an inquiry with status `new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        inquiry: &NewInquiry,
        at: DateTime<Utc>,
    ) -> Result<Inquiry, RepositoryError> {
        let created = sqlx::query_as::<_, Inquiry>(&format!(
            r"
            INSERT INTO inquiries (name, email, phone, message, product_id, product_name, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {INQUIRY_COLUMNS}
            "
        ))
        .bind(&inquiry.name)
        .bind(&inquiry.email)
        .bind(&inquiry.phone)
        .bind(&inquiry.message)
        .bind(inquiry.product_id)
        .bind(&inquiry.product_name)
        .bind(InquiryStatus::New.as_str())
        .bind(at)
        .fetch_one(self.pool)
        .await?;
        Ok(created)
    }

    /// All inquiries, newest first, with the current category of the
    /// referenced product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_category(&self) -> Result<Vec<InquiryWithCategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, InquiryWithCategory>(
            r"
            SELECT inquiries.id, inquiries.name, inquiries.email, inquiries.phone,
                   inquiries.message, inquiries.product_id, inquiries.product_name,
                   inquiries.status, inquiries.created_at,
                   products.category AS product_category
            FROM inquiries
            LEFT JOIN products ON products.id = inquiries.product_id
            ORDER BY inquiries.created_at DESC, inquiries.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }

    /// Set an inquiry's status and return the updated row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the inquiry does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: InquiryId,
        status: &str,
    ) -> Result<Inquiry, RepositoryError> {
        sqlx::query_as::<_, Inquiry>(&format!(
            "UPDATE inquiries SET status = ? WHERE id = ? RETURNING {INQUIRY_COLUMNS}"
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Number of inquiries.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM inquiries")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
