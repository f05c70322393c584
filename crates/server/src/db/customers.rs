//! Customer repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use velaris_core::CustomerId;

use super::RepositoryError;
use crate::models::Customer;

const CUSTOMER_COLUMNS: &str = "id, name, email, phone, created_at, last_inquiry_at";

/// Repository for customer operations.
pub struct CustomerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All customers, most recent inquiry first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY last_inquiry_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;
        Ok(customers)
    }

    /// Find the first customer (lowest id) matching the email or the phone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_contact(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<Option<CustomerId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, CustomerId>(
            "SELECT id FROM customers WHERE email = ? OR phone = ? ORDER BY id LIMIT 1",
        )
        .bind(email)
        .bind(phone)
        .fetch_optional(self.pool)
        .await?;
        Ok(id)
    }

    /// Overwrite a customer's contact details and stamp the inquiry time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn touch(
        &self,
        id: CustomerId,
        name: &str,
        email: &str,
        phone: &str,
        at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE customers SET name = ?, email = ?, phone = ?, last_inquiry_at = ? WHERE id = ?",
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(at)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Insert a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        at: DateTime<Utc>,
    ) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r"
            INSERT INTO customers (name, email, phone, created_at, last_inquiry_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {CUSTOMER_COLUMNS}
            "
        ))
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(at)
        .bind(at)
        .fetch_one(self.pool)
        .await?;
        Ok(customer)
    }

    /// Number of customers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
