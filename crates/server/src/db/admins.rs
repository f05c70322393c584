//! Admin account repository.

use chrono::Utc;
use sqlx::SqlitePool;

use velaris_core::AdminId;

use super::{RepositoryError, conflict_on_unique};
use crate::models::Admin;

/// Repository for admin account operations.
pub struct AdminRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an admin by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<Admin>, RepositoryError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, username, password_hash, created_at FROM admins WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;
        Ok(admin)
    }

    /// Get an admin by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, username, password_hash, created_at FROM admins WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(admin)
    }

    /// Create an admin with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<Admin, RepositoryError> {
        sqlx::query_as::<_, Admin>(
            r"
            INSERT INTO admins (username, password_hash, created_at)
            VALUES (?, ?, ?)
            RETURNING id, username, password_hash, created_at
            ",
        )
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "username"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let pool = test_support::pool().await;
        let repo = AdminRepository::new(&pool);

        let admin = repo.create("admin", "$argon2id$stub").await.unwrap();
        let found = repo.get_by_username("admin").await.unwrap().unwrap();
        assert_eq!(found.id, admin.id);
        assert_eq!(found.password_hash, "$argon2id$stub");
        assert!(repo.get_by_id(admin.id).await.unwrap().is_some());
        assert!(repo.get_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let pool = test_support::pool().await;
        let repo = AdminRepository::new(&pool);

        repo.create("admin", "a").await.unwrap();
        let err = repo.create("admin", "b").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }
}
