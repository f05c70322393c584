//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions. Cookies are signed
//! with a key derived from `VELARIS_SESSION_SECRET`.

use axum::Router;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha512};
use sqlx::SqlitePool;
use tower_sessions::cookie::Key;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::ServerConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "velaris_session";

/// Session expiry time in seconds (8 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 8 * 60 * 60;

/// Derive the cookie signing key from the configured secret.
///
/// Without a secret a random key is generated, so sessions do not survive a
/// restart.
#[must_use]
pub fn signing_key(config: &ServerConfig) -> Key {
    match &config.session_secret {
        Some(secret) => {
            let digest = Sha512::digest(secret.expose_secret().as_bytes());
            Key::from(digest.as_slice())
        }
        None => {
            tracing::warn!(
                "VELARIS_SESSION_SECRET is not set; using a random session key for this process"
            );
            Key::generate()
        }
    }
}

/// Wrap a router in the session layer backed by the `SQLite` store.
///
/// The `tower_sessions` table must already exist (see [`crate::db::migrate`]).
///
/// # Arguments
///
/// * `router` - Routes that need session access
/// * `pool` - `SQLite` connection pool
/// * `config` - Server configuration (for session secret and cookie security)
pub fn with_sessions<S>(router: Router<S>, pool: &SqlitePool, config: &ServerConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let store = SqliteStore::new(pool.clone());

    let layer = SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(config));

    router.layer(layer)
}
