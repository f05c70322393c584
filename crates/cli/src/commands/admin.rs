//! Admin account management.
//!
//! # Usage
//!
//! ```bash
//! # Ensure the account named by ADMIN_USERNAME exists
//! velaris-cli admin ensure
//!
//! # Ensure a differently named account, with ADMIN_PASSWORD as its password
//! velaris-cli admin ensure --username studio
//! ```
//!
//! # Environment Variables
//!
//! - `VELARIS_DATABASE_URL` - `SQLite` connection string
//! - `ADMIN_USERNAME` - Default username
//! - `ADMIN_PASSWORD` - Password for a newly created account

use secrecy::ExposeSecret;
use thiserror::Error;
use velaris_server::db::{self, MigrationError};
use velaris_server::services::{AuthError, AuthService};

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// Username is blank.
    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Admin account error: {0}")]
    Auth(#[from] AuthError),
}

/// Create the admin account unless it already exists.
///
/// Existing accounts are never modified. Returns whether an account was
/// created.
pub async fn ensure(username: Option<&str>) -> Result<bool, AdminError> {
    let (config, pool) = connect().await?;
    db::migrate(&pool).await?;

    let username = username
        .unwrap_or(config.admin.username.as_str())
        .trim()
        .to_owned();
    if username.is_empty() {
        return Err(AdminError::EmptyUsername);
    }

    let created = AuthService::new(&pool)
        .ensure_admin(&username, config.admin.password.expose_secret())
        .await?;

    if created {
        tracing::info!(username = %username, "Admin account created");
    } else {
        tracing::info!(username = %username, "Admin account already exists, left unchanged");
    }

    Ok(created)
}
