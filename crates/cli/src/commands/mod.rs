//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use sqlx::SqlitePool;
use thiserror::Error;
use velaris_server::config::{ConfigError, ServerConfig};
use velaris_server::db;

/// Errors shared by every command while connecting.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Load configuration and open the database named by it.
pub async fn connect() -> Result<(ServerConfig, SqlitePool), ConnectError> {
    let config = ServerConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    Ok((config, pool))
}
