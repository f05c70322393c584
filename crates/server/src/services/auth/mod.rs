//! Authentication service.
//!
//! Password login for back office admins and the startup bootstrap of the
//! configured admin account.

mod error;

pub use error::AuthError;

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use crate::db::RepositoryError;
use crate::db::admins::AdminRepository;
use crate::models::{Admin, CurrentAdmin};

/// Hash verified when the username is unknown, so a miss costs as much as a
/// wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("velaris-timing-equalizer").ok());

/// Authentication service.
pub struct AuthService<'a> {
    admins: AdminRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            admins: AdminRepository::new(pool),
        }
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either value is blank.
    /// Returns `AuthError::InvalidCredentials` if the username is unknown or
    /// the password does not match.
    pub async fn login(&self, username: &str, password: &str) -> Result<CurrentAdmin, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let Some(admin) = self.admins.get_by_username(username).await? else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(password, dummy);
            }
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &admin.password_hash)?;

        Ok(CurrentAdmin {
            id: admin.id,
            username: admin.username,
        })
    }

    /// Create the admin account if no admin with this username exists.
    ///
    /// Returns `true` when an account was created. Existing accounts are
    /// left untouched, including their password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    /// Returns `AuthError::Repository` for database errors.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        if self.admins.get_by_username(username).await?.is_some() {
            return Ok(false);
        }

        let password_hash = hash_password(password)?;
        match self.admins.create(username, &password_hash).await {
            Ok(Admin { id, .. }) => {
                tracing::info!(admin_id = %id, username, "Created admin account");
                Ok(true)
            }
            // Another process created it between the lookup and the insert
            Err(RepositoryError::Conflict(_)) => Ok(false),
            Err(e) => Err(AuthError::Repository(e)),
        }
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Velaris@123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Velaris@123", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-hash"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_ensure_admin_then_login() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);

        assert!(auth.ensure_admin("admin", "Velaris@123").await.unwrap());
        assert!(!auth.ensure_admin("admin", "other").await.unwrap());

        let admin = auth.login("admin", "Velaris@123").await.unwrap();
        assert_eq!(admin.username, "admin");

        // Second ensure did not overwrite the password
        assert!(matches!(
            auth.login("admin", "other").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_failures() {
        let pool = test_support::pool().await;
        let auth = AuthService::new(&pool);
        auth.ensure_admin("admin", "Velaris@123").await.unwrap();

        assert!(matches!(
            auth.login("", "x").await,
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            auth.login("admin", "").await,
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            auth.login("ghost", "Velaris@123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }
}
