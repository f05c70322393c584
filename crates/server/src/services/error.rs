//! Service-level error type.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::uploads::UploadError;

/// Errors returned by the catalog and inquiry services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed validation; the message is safe to show to clients.
    #[error("{0}")]
    Validation(String),

    /// The addressed entity does not exist (or is hidden from the caller).
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The image upload was rejected or could not be stored.
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Map a repository `NotFound` onto the named entity.
    pub(crate) fn not_found_as(entity: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |err| match err {
            RepositoryError::NotFound => Self::NotFound(entity),
            other => Self::Repository(other),
        }
    }
}
