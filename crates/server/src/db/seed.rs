//! Demo catalog inserted into an empty database.

use sqlx::SqlitePool;

use velaris_core::base_slug;

use super::{ProductRepository, RepositoryError};
use crate::models::NewProduct;

/// A demo product definition.
struct SeedProduct {
    name: &'static str,
    category: &'static str,
    description: &'static str,
    materials: &'static str,
    craftsmanship: &'static str,
    image_url: &'static str,
    featured: bool,
    stock: i64,
}

const DEMO_CATALOG: &[SeedProduct] = &[
    SeedProduct {
        name: "Aurelia Crescent Sofa",
        category: "sofas",
        description: "A sculptural silhouette with deep lounge geometry for cinematic living rooms.",
        materials: "Italian bouclé, kiln-dried hardwood frame, brushed bronze base",
        craftsmanship: "Hand-stitched channel seams and multi-density cushioning tuned for quiet long-form comfort.",
        image_url: "https://images.unsplash.com/photo-1555041469-a586c61ea9bc?auto=format&fit=crop&w=1200&q=80",
        featured: true,
        stock: 4,
    },
    SeedProduct {
        name: "Monolith Grand Sofa",
        category: "sofas",
        description: "Low-profile architectural sofa designed for expansive salons.",
        materials: "Performance velvet, walnut frame core, matte black steel feet",
        craftsmanship: "Precision-cut panels and hand-balanced upholstery tension for immaculate contour retention.",
        image_url: "https://images.unsplash.com/photo-1615529182904-14819c35db37?auto=format&fit=crop&w=1200&q=80",
        featured: false,
        stock: 2,
    },
    SeedProduct {
        name: "Noir Canopy Bed",
        category: "beds",
        description: "A serene monumental bed frame composed for contemporary suites.",
        materials: "Smoked oak veneer, hand-finished matte lacquer, premium linen headboard",
        craftsmanship: "Joinery-led construction with acoustic dampening layers for premium rest environments.",
        image_url: "https://images.unsplash.com/photo-1505693416388-ac5ce068fe85?auto=format&fit=crop&w=1200&q=80",
        featured: true,
        stock: 3,
    },
    SeedProduct {
        name: "Ivory Sanctuary Bed",
        category: "beds",
        description: "Soft-edged bed architecture for warm neutral master bedrooms.",
        materials: "Textured linen, ash timber frame, brushed nickel accents",
        craftsmanship: "Layered upholstering and hand-pressed edge finishing by heritage artisans.",
        image_url: "https://images.unsplash.com/photo-1616046229478-9901c5536a45?auto=format&fit=crop&w=1200&q=80",
        featured: false,
        stock: 5,
    },
    SeedProduct {
        name: "Aurelle Lounge Chair",
        category: "chairs",
        description: "Collector-grade lounge chair with curved back profile and floating stance.",
        materials: "Full-grain leather, cast aluminum base, walnut arm inlays",
        craftsmanship: "Hand-burnished leather and precision pressure-tested frame geometry.",
        image_url: "https://images.unsplash.com/photo-1519947486511-46149fa0a254?auto=format&fit=crop&w=1200&q=80",
        featured: true,
        stock: 7,
    },
    SeedProduct {
        name: "Contour Accent Chair",
        category: "chairs",
        description: "Minimal gallery chair designed as an artistic punctuation piece.",
        materials: "Velvet weave, sculpted beechwood shell, matte brass caps",
        craftsmanship: "Contour-matched cushioning and hand-polished detailing across all contact surfaces.",
        image_url: "https://images.unsplash.com/photo-1582582429416-a4f0f6e2053d?auto=format&fit=crop&w=1200&q=80",
        featured: false,
        stock: 6,
    },
    SeedProduct {
        name: "Bianco Marble Dining Table",
        category: "tables",
        description: "A commanding slab table with gallery-grade visual gravity.",
        materials: "Bianco marble top, blackened steel pedestal, anti-stain protective finish",
        craftsmanship: "Book-matched marble veining and hand-honed edge profile executed in atelier conditions.",
        image_url: "https://images.unsplash.com/photo-1556911220-bda9f7f7597e?auto=format&fit=crop&w=1200&q=80",
        featured: true,
        stock: 2,
    },
    SeedProduct {
        name: "Monolith Side Table",
        category: "tables",
        description: "Compact sculptural side table balancing stone and metal in refined proportion.",
        materials: "Travertine top, matte bronze column, concealed stabilizing core",
        craftsmanship: "Hand-polished stone finishing and calibrated weight distribution for perfect stance.",
        image_url: "https://images.unsplash.com/photo-1634712282287-14ed57b9cc89?auto=format&fit=crop&w=1200&q=80",
        featured: false,
        stock: 9,
    },
];

impl SeedProduct {
    fn to_new_product(&self) -> NewProduct {
        NewProduct {
            name: self.name.to_owned(),
            slug: base_slug(self.name),
            category: self.category.to_owned(),
            description: self.description.to_owned(),
            materials: self.materials.to_owned(),
            craftsmanship: self.craftsmanship.to_owned(),
            image_url: self.image_url.to_owned(),
            image_path: None,
            featured: self.featured,
            stock: self.stock,
            is_available: true,
            is_visible: true,
        }
    }
}

/// Insert the demo catalog if the products table is empty.
///
/// Returns the number of products inserted (zero when the catalog already
/// has entries).
///
/// # Errors
///
/// Returns `RepositoryError` if counting or inserting fails.
pub async fn seed_catalog(pool: &SqlitePool) -> Result<usize, RepositoryError> {
    let products = ProductRepository::new(pool);

    if products.count().await? > 0 {
        tracing::debug!("Catalog already populated, skipping demo seed");
        return Ok(0);
    }

    for seed in DEMO_CATALOG {
        products.create(&seed.to_new_product()).await?;
    }

    tracing::info!(count = DEMO_CATALOG.len(), "Seeded demo catalog");
    Ok(DEMO_CATALOG.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;
    use crate::models::ProductFilter;

    #[tokio::test]
    async fn test_seed_only_into_empty_catalog() {
        let pool = test_support::pool().await;

        assert_eq!(seed_catalog(&pool).await.unwrap(), 8);
        assert_eq!(seed_catalog(&pool).await.unwrap(), 0);

        let products = ProductRepository::new(&pool)
            .list(&ProductFilter::all())
            .await
            .unwrap();
        assert_eq!(products.len(), 8);
        assert!(products.iter().any(|p| p.slug == "bianco-marble-dining-table"));
    }

    #[test]
    fn test_demo_slugs_are_distinct() {
        let mut slugs: Vec<String> = DEMO_CATALOG.iter().map(|p| base_slug(p.name)).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), DEMO_CATALOG.len());
    }
}
