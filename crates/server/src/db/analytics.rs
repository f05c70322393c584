//! Read-only dashboard counters.

use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use super::RepositoryError;

/// Products at or below this stock level count as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 2;

/// Live catalog and inquiry counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_products: i64,
    pub featured_products: i64,
    /// Available and visible.
    pub available_products: i64,
    pub total_inquiries: i64,
    pub total_customers: i64,
    pub low_stock_products: i64,
}

/// Repository computing dashboard counters.
pub struct AnalyticsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnalyticsRepository<'a> {
    /// Create a new analytics repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Compute all counters in a single statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn snapshot(&self) -> Result<AnalyticsSnapshot, RepositoryError> {
        let snapshot = sqlx::query_as::<_, AnalyticsSnapshot>(
            r"
            SELECT
                (SELECT COUNT(*) FROM products) AS total_products,
                (SELECT COUNT(*) FROM products WHERE featured = 1) AS featured_products,
                (SELECT COUNT(*) FROM products WHERE is_available = 1 AND is_visible = 1)
                    AS available_products,
                (SELECT COUNT(*) FROM inquiries) AS total_inquiries,
                (SELECT COUNT(*) FROM customers) AS total_customers,
                (SELECT COUNT(*) FROM products WHERE stock <= ?) AS low_stock_products
            ",
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_one(self.pool)
        .await?;
        Ok(snapshot)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{seed, test_support};

    #[tokio::test]
    async fn test_empty_database_counts_zero() {
        let pool = test_support::pool().await;
        let snapshot = AnalyticsRepository::new(&pool).snapshot().await.unwrap();
        assert_eq!(
            snapshot,
            AnalyticsSnapshot {
                total_products: 0,
                featured_products: 0,
                available_products: 0,
                total_inquiries: 0,
                total_customers: 0,
                low_stock_products: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_counts_over_demo_catalog() {
        let pool = test_support::pool().await;
        seed::seed_catalog(&pool).await.unwrap();

        let snapshot = AnalyticsRepository::new(&pool).snapshot().await.unwrap();
        assert_eq!(snapshot.total_products, 8);
        assert_eq!(snapshot.featured_products, 4);
        assert_eq!(snapshot.available_products, 8);
        // Monolith Grand Sofa and Bianco Marble Dining Table hold two each
        assert_eq!(snapshot.low_stock_products, 2);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(AnalyticsSnapshot {
            total_products: 1,
            featured_products: 0,
            available_products: 1,
            total_inquiries: 2,
            total_customers: 1,
            low_stock_products: 0,
        })
        .unwrap();

        assert_eq!(json["totalProducts"], 1);
        assert_eq!(json["lowStockProducts"], 0);
        assert_eq!(json["totalInquiries"], 2);
    }
}
