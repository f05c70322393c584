//! Product repository for database operations.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use velaris_core::ProductId;

use super::{RepositoryError, conflict_on_unique};
use crate::models::{NewProduct, Product, ProductChanges, ProductFilter};

const PRODUCT_COLUMNS: &str = "id, name, slug, category, description, materials, craftsmanship, \
     image_url, image_path, featured, stock, is_available, is_visible, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List products matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut query: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE 1 = 1"));

        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if filter.featured_only {
            query.push(" AND featured = 1");
        }
        if !filter.include_hidden {
            query.push(" AND is_visible = 1");
        }
        query.push(" ORDER BY created_at DESC, id DESC");

        let products = query
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;
        Ok(products)
    }

    /// Get a product by ID, regardless of visibility.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(product)
    }

    /// Get a product by slug, regardless of visibility.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = ?"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;
        Ok(product)
    }

    /// Get just the display name of a product, for inquiry snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_name(&self, id: ProductId) -> Result<Option<String>, RepositoryError> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(name)
    }

    /// Whether a slug is held by any product other than `exclude`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn slug_taken(
        &self,
        slug: &str,
        exclude: Option<ProductId>,
    ) -> Result<bool, RepositoryError> {
        let holder = match exclude {
            Some(id) => {
                sqlx::query_scalar::<_, i64>("SELECT id FROM products WHERE slug = ? AND id != ?")
                    .bind(slug)
                    .bind(id)
                    .fetch_optional(self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT id FROM products WHERE slug = ?")
                    .bind(slug)
                    .fetch_optional(self.pool)
                    .await?
            }
        };
        Ok(holder.is_some())
    }

    /// Total number of products, hidden ones included.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let now = Utc::now();
        sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO products (name, slug, category, description, materials, craftsmanship,
                                  image_url, image_path, featured, stock, is_available, is_visible,
                                  created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&product.name)
        .bind(&product.slug)
        .bind(&product.category)
        .bind(&product.description)
        .bind(&product.materials)
        .bind(&product.craftsmanship)
        .bind(&product.image_url)
        .bind(&product.image_path)
        .bind(product.featured)
        .bind(product.stock)
        .bind(product.is_available)
        .bind(product.is_visible)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "slug"))
    }

    /// Overwrite every mutable column of a product and bump `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Conflict` if the slug is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE products
            SET name = ?, slug = ?, category = ?, description = ?, materials = ?,
                craftsmanship = ?, image_url = ?, image_path = ?, featured = ?, stock = ?,
                is_available = ?, is_visible = ?, updated_at = ?
            WHERE id = ?
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&changes.name)
        .bind(&changes.slug)
        .bind(&changes.category)
        .bind(&changes.description)
        .bind(&changes.materials)
        .bind(&changes.craftsmanship)
        .bind(&changes.image_url)
        .bind(&changes.image_path)
        .bind(changes.featured)
        .bind(changes.stock)
        .bind(changes.is_available)
        .bind(changes.is_visible)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "slug"))?
        .ok_or(RepositoryError::NotFound)
    }

    /// Hard-delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    fn sample(name: &str, slug: &str) -> NewProduct {
        NewProduct {
            name: name.to_owned(),
            slug: slug.to_owned(),
            category: "sofas".to_owned(),
            description: "Deep lounge geometry".to_owned(),
            materials: "Boucle, walnut".to_owned(),
            craftsmanship: "Hand-stitched seams".to_owned(),
            image_url: String::new(),
            image_path: None,
            featured: false,
            stock: 3,
            is_available: true,
            is_visible: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let pool = test_support::pool().await;
        let repo = ProductRepository::new(&pool);

        let created = repo.create(&sample("Aurelia Sofa", "aurelia-sofa")).await.unwrap();
        assert_eq!(created.slug, "aurelia-sofa");
        assert!(created.is_visible);

        let by_slug = repo.get_by_slug("aurelia-sofa").await.unwrap().unwrap();
        assert_eq!(by_slug.id, created.id);
        assert_eq!(repo.get_name(created.id).await.unwrap().as_deref(), Some("Aurelia Sofa"));
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let pool = test_support::pool().await;
        let repo = ProductRepository::new(&pool);

        repo.create(&sample("One", "same")).await.unwrap();
        let err = repo.create(&sample("Two", "same")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_slug_taken_excludes_self() {
        let pool = test_support::pool().await;
        let repo = ProductRepository::new(&pool);

        let product = repo.create(&sample("Chair", "chair")).await.unwrap();
        assert!(repo.slug_taken("chair", None).await.unwrap());
        assert!(!repo.slug_taken("chair", Some(product.id)).await.unwrap());
        assert!(!repo.slug_taken("table", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let pool = test_support::pool().await;
        let repo = ProductRepository::new(&pool);

        let first = repo.create(&sample("First", "first")).await.unwrap();
        let mut hidden = sample("Hidden", "hidden");
        hidden.is_visible = false;
        repo.create(&hidden).await.unwrap();
        let mut bed = sample("Bed", "bed");
        bed.category = "beds".to_owned();
        bed.featured = true;
        let bed = repo.create(&bed).await.unwrap();

        let visible = repo.list(&ProductFilter::default()).await.unwrap();
        let slugs: Vec<&str> = visible.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["bed", "first"]);

        let all = repo.list(&ProductFilter::all()).await.unwrap();
        assert_eq!(all.len(), 3);

        let beds = repo
            .list(&ProductFilter {
                category: Some("beds".to_owned()),
                ..ProductFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(beds.len(), 1);
        assert_eq!(beds[0].id, bed.id);

        let featured = repo
            .list(&ProductFilter {
                featured_only: true,
                ..ProductFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(featured.len(), 1);
        assert_ne!(featured[0].id, first.id);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let pool = test_support::pool().await;
        let repo = ProductRepository::new(&pool);

        let product = repo.create(&sample("Sofa", "sofa")).await.unwrap();
        let mut changes = ProductChanges::from_existing(&product);
        changes.stock = 0;
        changes.is_available = false;

        let updated = repo.update(product.id, &changes).await.unwrap();
        assert_eq!(updated.stock, 0);
        assert!(!updated.is_available);
        assert!(updated.updated_at >= product.updated_at);

        repo.delete(product.id).await.unwrap();
        assert!(repo.get_by_id(product.id).await.unwrap().is_none());
        assert!(matches!(
            repo.delete(product.id).await.unwrap_err(),
            RepositoryError::NotFound
        ));
        assert!(matches!(
            repo.update(product.id, &changes).await.unwrap_err(),
            RepositoryError::NotFound
        ));
    }
}
