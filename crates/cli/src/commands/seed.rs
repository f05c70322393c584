//! Demo catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! velaris-cli seed
//! ```
//!
//! Migrations are applied first. Products are only inserted when the
//! catalog is empty, so running the command twice is harmless.

use thiserror::Error;
use velaris_server::db::{self, MigrationError, RepositoryError};

use super::{ConnectError, connect};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    #[error("Seeding failed: {0}")]
    Repository(#[from] RepositoryError),
}

/// Seed the demo catalog. Returns the number of products inserted.
pub async fn run() -> Result<usize, SeedError> {
    let (_config, pool) = connect().await?;
    db::migrate(&pool).await?;

    let inserted = db::seed::seed_catalog(&pool).await?;
    if inserted == 0 {
        tracing::info!("Catalog already has products, nothing seeded");
    } else {
        tracing::info!(count = inserted, "Seeded demo catalog");
    }

    Ok(inserted)
}
