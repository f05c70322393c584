//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! velaris-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `VELARIS_DATABASE_URL` - `SQLite` connection string (fallback `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Catalog migrations live in `crates/server/migrations/`. The session
//! store creates its own table in the same database.

use thiserror::Error;
use velaris_server::db::{self, MigrationError};

use super::{ConnectError, connect};

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Migration(#[from] MigrationError),
}

/// Apply all pending migrations.
pub async fn run() -> Result<(), MigrateError> {
    let (_config, pool) = connect().await?;

    tracing::info!("Running migrations...");
    db::migrate(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
