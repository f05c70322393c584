//! Product catalog service.
//!
//! Owns the rules around product writes: required fields, slug assignment
//! with collision suffixes, lenient flag and stock parsing, and the image
//! replacement policy on update.

use serde::Deserialize;
use sqlx::SqlitePool;

use velaris_core::{FlagInput, ProductId, StockInput, base_slug, resolve_flag, with_suffix};

use super::ServiceError;
use crate::db::ProductRepository;
use crate::models::{NewProduct, Product, ProductChanges, ProductFilter};
use crate::uploads::{ImageStore, UploadedImage};

const PRODUCT: &str = "Product";

/// Product fields as submitted by the back office.
///
/// The same shape is produced from JSON, urlencoded and multipart bodies.
/// Every field is optional here; [`CatalogService::create`] enforces the
/// required ones and [`CatalogService::update`] treats absent or blank
/// values as "keep".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub materials: Option<String>,
    pub craftsmanship: Option<String>,
    pub image_url: Option<String>,
    pub featured: Option<FlagInput>,
    pub stock: Option<StockInput>,
    pub is_available: Option<FlagInput>,
    pub is_visible: Option<FlagInput>,
    /// Drop the current image before applying `image_url` (update only).
    pub clear_image: Option<FlagInput>,
}

/// Trimmed, non-blank text or `None`.
fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Product catalog service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
    images: &'a ImageStore,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, images: &'a ImageStore) -> Self {
        Self {
            products: ProductRepository::new(pool),
            images,
        }
    }

    /// List products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, ServiceError> {
        Ok(self.products.list(filter).await?)
    }

    /// Get a product by ID. Hidden products are only returned when
    /// `include_hidden` is set.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product is absent or hidden.
    pub async fn get_by_id(
        &self,
        id: ProductId,
        include_hidden: bool,
    ) -> Result<Product, ServiceError> {
        self.products
            .get_by_id(id)
            .await?
            .filter(|p| include_hidden || p.is_visible)
            .ok_or(ServiceError::NotFound(PRODUCT))
    }

    /// Get a product by slug. Hidden products are only returned when
    /// `include_hidden` is set.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product is absent or hidden.
    pub async fn get_by_slug(
        &self,
        slug: &str,
        include_hidden: bool,
    ) -> Result<Product, ServiceError> {
        self.products
            .get_by_slug(slug)
            .await?
            .filter(|p| include_hidden || p.is_visible)
            .ok_or(ServiceError::NotFound(PRODUCT))
    }

    /// Create a product.
    ///
    /// An uploaded image wins over `image_url`; with neither the image is
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if a required field is blank.
    /// Returns `ServiceError::Upload` if the image cannot be stored.
    pub async fn create(
        &self,
        input: &ProductInput,
        image: Option<&UploadedImage>,
    ) -> Result<Product, ServiceError> {
        let (Some(name), Some(category), Some(description), Some(materials), Some(craftsmanship)) = (
            present(input.name.as_ref()),
            present(input.category.as_ref()),
            present(input.description.as_ref()),
            present(input.materials.as_ref()),
            present(input.craftsmanship.as_ref()),
        ) else {
            return Err(ServiceError::Validation(
                "Missing required product fields".to_owned(),
            ));
        };

        let slug = self.unique_slug(name, None).await?;

        let (image_url, image_path) = match image {
            Some(image) => {
                let public = self.images.save(image).await?;
                (public.clone(), Some(public))
            }
            None => (
                present(input.image_url.as_ref()).unwrap_or_default().to_owned(),
                None,
            ),
        };

        let new_product = NewProduct {
            name: name.to_owned(),
            slug,
            category: category.to_owned(),
            description: description.to_owned(),
            materials: materials.to_owned(),
            craftsmanship: craftsmanship.to_owned(),
            image_url,
            image_path,
            featured: resolve_flag(input.featured.as_ref(), false),
            stock: input.stock.as_ref().and_then(StockInput::parse).unwrap_or(0),
            is_available: resolve_flag(input.is_available.as_ref(), true),
            is_visible: resolve_flag(input.is_visible.as_ref(), true),
        };

        let product = match self.products.create(&new_product).await {
            Ok(product) => product,
            Err(e) => {
                self.discard_upload(new_product.image_path.as_deref()).await;
                return Err(e.into());
            }
        };

        tracing::info!(product_id = %product.id, slug = %product.slug, "Created product");
        Ok(product)
    }

    /// Apply a partial update to a product.
    ///
    /// Absent or blank fields keep their value, as do unparseable flags and
    /// stock values. The slug is regenerated only when the name changes.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product does not exist.
    /// Returns `ServiceError::Upload` if the image cannot be stored.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
        image: Option<&UploadedImage>,
    ) -> Result<Product, ServiceError> {
        let existing = self
            .products
            .get_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(PRODUCT))?;
        let mut changes = ProductChanges::from_existing(&existing);

        if let Some(name) = present(input.name.as_ref())
            && name != existing.name
        {
            changes.slug = self.unique_slug(name, Some(id)).await?;
            name.clone_into(&mut changes.name);
        }
        if let Some(category) = present(input.category.as_ref()) {
            category.clone_into(&mut changes.category);
        }
        if let Some(description) = present(input.description.as_ref()) {
            description.clone_into(&mut changes.description);
        }
        if let Some(materials) = present(input.materials.as_ref()) {
            materials.clone_into(&mut changes.materials);
        }
        if let Some(craftsmanship) = present(input.craftsmanship.as_ref()) {
            craftsmanship.clone_into(&mut changes.craftsmanship);
        }

        changes.featured = resolve_flag(input.featured.as_ref(), existing.featured);
        changes.is_available = resolve_flag(input.is_available.as_ref(), existing.is_available);
        changes.is_visible = resolve_flag(input.is_visible.as_ref(), existing.is_visible);
        if let Some(stock) = input.stock.as_ref().and_then(StockInput::parse) {
            changes.stock = stock;
        }

        let new_url = present(input.image_url.as_ref());
        let mut uploaded = None;
        if let Some(image) = image {
            let public = self.images.save(image).await?;
            changes.image_url.clone_from(&public);
            changes.image_path = Some(public.clone());
            uploaded = Some(public);
        } else if resolve_flag(input.clear_image.as_ref(), false) {
            changes.image_url = new_url.unwrap_or_default().to_owned();
            changes.image_path = None;
        } else if let Some(url) = new_url {
            url.clone_into(&mut changes.image_url);
        }

        let product = match self.products.update(id, &changes).await {
            Ok(product) => product,
            Err(e) => {
                self.discard_upload(uploaded.as_deref()).await;
                return Err(ServiceError::not_found_as(PRODUCT)(e));
            }
        };

        tracing::info!(product_id = %product.id, slug = %product.slug, "Updated product");
        Ok(product)
    }

    /// Hard-delete a product. Inquiries keep their snapshot of it.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), ServiceError> {
        self.products
            .delete(id)
            .await
            .map_err(ServiceError::not_found_as(PRODUCT))?;

        tracing::info!(product_id = %id, "Deleted product");
        Ok(())
    }

    /// Remove a file saved for a write that did not land.
    async fn discard_upload(&self, public_path: Option<&str>) {
        if let Some(public_path) = public_path {
            self.images.discard(public_path).await;
        }
    }

    /// First free slug for `name`: the base, then `base-1`, `base-2`, ...
    async fn unique_slug(
        &self,
        name: &str,
        exclude: Option<ProductId>,
    ) -> Result<String, ServiceError> {
        let base = base_slug(name);
        let mut attempt: u32 = 0;
        loop {
            let candidate = with_suffix(&base, attempt);
            if !self.products.slug_taken(&candidate, exclude).await? {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Bytes;

    use super::*;
    use crate::db::test_support;

    fn input(name: &str) -> ProductInput {
        ProductInput {
            name: Some(name.to_owned()),
            category: Some("sofas".to_owned()),
            description: Some("Deep lounge geometry".to_owned()),
            materials: Some("Boucle".to_owned()),
            craftsmanship: Some("Hand-stitched".to_owned()),
            ..ProductInput::default()
        }
    }

    fn temp_store() -> ImageStore {
        ImageStore::new(std::env::temp_dir().join(format!("velaris-{}", uuid::Uuid::new_v4())))
    }

    fn png() -> UploadedImage {
        UploadedImage {
            file_name: "sofa.png".to_owned(),
            content_type: "image/png".to_owned(),
            bytes: Bytes::from_static(b"png"),
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let pool = test_support::pool().await;
        let store = temp_store();
        let catalog = CatalogService::new(&pool, &store);

        let product = catalog.create(&input("Aurelia Sofa"), None).await.unwrap();
        assert_eq!(product.slug, "aurelia-sofa");
        assert!(!product.featured);
        assert!(product.is_available);
        assert!(product.is_visible);
        assert_eq!(product.stock, 0);
        assert_eq!(product.image_url, "");
        assert_eq!(product.image_path, None);
    }

    #[tokio::test]
    async fn test_create_suffixes_duplicate_slugs() {
        let pool = test_support::pool().await;
        let store = temp_store();
        let catalog = CatalogService::new(&pool, &store);

        let first = catalog.create(&input("Aurelia Sofa"), None).await.unwrap();
        let second = catalog.create(&input("Aurelia Sofa"), None).await.unwrap();
        let third = catalog.create(&input("aurelia  sofa!"), None).await.unwrap();
        assert_eq!(first.slug, "aurelia-sofa");
        assert_eq!(second.slug, "aurelia-sofa-1");
        assert_eq!(third.slug, "aurelia-sofa-2");
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let pool = test_support::pool().await;
        let store = temp_store();
        let catalog = CatalogService::new(&pool, &store);

        let mut missing = input("Chair");
        missing.materials = Some("   ".to_owned());
        assert!(matches!(
            catalog.create(&missing, None).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_parses_lenient_values() {
        let pool = test_support::pool().await;
        let store = temp_store();
        let catalog = CatalogService::new(&pool, &store);

        let mut form = input("Noir Canopy Bed");
        form.featured = Some(FlagInput::Text("on".to_owned()));
        form.is_visible = Some(FlagInput::Text("false".to_owned()));
        form.stock = Some(StockInput::Text("3".to_owned()));
        form.image_url = Some("https://images.example/bed.jpg".to_owned());

        let product = catalog.create(&form, None).await.unwrap();
        assert!(product.featured);
        assert!(!product.is_visible);
        assert_eq!(product.stock, 3);
        assert_eq!(product.image_url, "https://images.example/bed.jpg");
        assert_eq!(product.image_path, None);

        assert!(matches!(
            catalog.get_by_id(product.id, false).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(catalog.get_by_id(product.id, true).await.is_ok());
    }

    #[tokio::test]
    async fn test_upload_wins_over_url() {
        let pool = test_support::pool().await;
        let store = temp_store();
        let catalog = CatalogService::new(&pool, &store);

        let mut form = input("Sofa");
        form.image_url = Some("https://images.example/ignored.jpg".to_owned());
        let product = catalog.create(&form, Some(&png())).await.unwrap();

        assert!(product.image_url.starts_with("/uploads/"));
        assert_eq!(product.image_path.as_deref(), Some(product.image_url.as_str()));
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[tokio::test]
    async fn test_update_keeps_blank_fields_and_reslugs_on_rename() {
        let pool = test_support::pool().await;
        let store = temp_store();
        let catalog = CatalogService::new(&pool, &store);

        catalog.create(&input("Monolith Sofa"), None).await.unwrap();
        let product = catalog.create(&input("Grand Sofa"), None).await.unwrap();

        let same_name = ProductInput {
            name: Some("Grand Sofa".to_owned()),
            category: Some(String::new()),
            stock: Some(StockInput::Text("lots".to_owned())),
            ..ProductInput::default()
        };
        let unchanged = catalog.update(product.id, &same_name, None).await.unwrap();
        assert_eq!(unchanged.slug, "grand-sofa");
        assert_eq!(unchanged.category, "sofas");
        assert_eq!(unchanged.stock, 0);

        let rename = ProductInput {
            name: Some("Monolith Sofa".to_owned()),
            ..ProductInput::default()
        };
        let renamed = catalog.update(product.id, &rename, None).await.unwrap();
        assert_eq!(renamed.name, "Monolith Sofa");
        assert_eq!(renamed.slug, "monolith-sofa-1");
    }

    #[tokio::test]
    async fn test_update_image_policy() {
        let pool = test_support::pool().await;
        let store = temp_store();
        let catalog = CatalogService::new(&pool, &store);

        let product = catalog.create(&input("Chair"), Some(&png())).await.unwrap();
        let uploaded = product.image_path.clone().unwrap();

        // URL only: display source changes, upload reference stays
        let url_only = ProductInput {
            image_url: Some("https://images.example/chair.jpg".to_owned()),
            ..ProductInput::default()
        };
        let updated = catalog.update(product.id, &url_only, None).await.unwrap();
        assert_eq!(updated.image_url, "https://images.example/chair.jpg");
        assert_eq!(updated.image_path.as_deref(), Some(uploaded.as_str()));

        // Clear drops both
        let clear = ProductInput {
            clear_image: Some(FlagInput::Bool(true)),
            ..ProductInput::default()
        };
        let cleared = catalog.update(product.id, &clear, None).await.unwrap();
        assert_eq!(cleared.image_url, "");
        assert_eq!(cleared.image_path, None);

        // Nothing supplied: unchanged
        let untouched = catalog
            .update(product.id, &ProductInput::default(), None)
            .await
            .unwrap();
        assert_eq!(untouched.image_url, "");

        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[tokio::test]
    async fn test_update_with_upload_replaces_both_image_fields() {
        let pool = test_support::pool().await;
        let store = temp_store();
        let catalog = CatalogService::new(&pool, &store);

        let mut form = input("Lounge Chair");
        form.image_url = Some("https://images.example/chair.jpg".to_owned());
        let product = catalog.create(&form, None).await.unwrap();

        let updated = catalog
            .update(product.id, &ProductInput::default(), Some(&png()))
            .await
            .unwrap();
        assert!(updated.image_url.starts_with("/uploads/"));
        assert_eq!(updated.image_path.as_deref(), Some(updated.image_url.as_str()));
        assert_eq!(std::fs::read_dir(store.dir()).unwrap().count(), 1);

        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[tokio::test]
    async fn test_failed_write_removes_saved_upload() {
        let pool = test_support::pool().await;
        let store = temp_store();
        let catalog = CatalogService::new(&pool, &store);
        let product = catalog.create(&input("Side Table"), None).await.unwrap();

        sqlx::query(
            "CREATE TRIGGER reject_writes_insert BEFORE INSERT ON products \
             BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "CREATE TRIGGER reject_writes_update BEFORE UPDATE ON products \
             BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        assert!(matches!(
            catalog.create(&input("Console Table"), Some(&png())).await,
            Err(ServiceError::Repository(_))
        ));
        assert!(matches!(
            catalog
                .update(product.id, &ProductInput::default(), Some(&png()))
                .await,
            Err(ServiceError::Repository(_))
        ));

        // Both saves happened and were rolled back on disk
        assert_eq!(std::fs::read_dir(store.dir()).unwrap().count(), 0);
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_product() {
        let pool = test_support::pool().await;
        let store = temp_store();
        let catalog = CatalogService::new(&pool, &store);
        let missing = ProductId::new(404);

        assert!(matches!(
            catalog.update(missing, &ProductInput::default(), None).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            catalog.delete(missing).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
