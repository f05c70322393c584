//! Product image uploads.
//!
//! Images arrive as the `image` part of a multipart product form. The part
//! must declare an `image/*` content type and stay within
//! [`MAX_IMAGE_BYTES`]. Accepted files are written to the upload directory
//! as `<unix-millis>-<sanitized original name>` and exposed under
//! `/uploads/`.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::multipart::{Field, MultipartError};
use chrono::Utc;
use thiserror::Error;

/// Per-file upload cap (6 MiB).
pub const MAX_IMAGE_BYTES: usize = 6 * 1024 * 1024;

/// Request body cap for routes accepting an upload: the file plus room for
/// the accompanying form fields.
pub const MAX_UPLOAD_BODY_BYTES: usize = MAX_IMAGE_BYTES + 512 * 1024;

/// URL prefix uploaded files are served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Errors raised while receiving or storing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The part did not declare an `image/*` content type.
    #[error("Only image uploads are allowed")]
    NotAnImage,

    /// The file exceeded [`MAX_IMAGE_BYTES`].
    #[error("Image exceeds the {} MiB limit", MAX_IMAGE_BYTES / (1024 * 1024))]
    TooLarge,

    /// The multipart body could not be parsed.
    #[error("Malformed multipart body: {0}")]
    Malformed(String),

    /// Writing the file to disk failed.
    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        if err.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
            Self::TooLarge
        } else {
            Self::Malformed(err.body_text())
        }
    }
}

/// An image received in memory, not yet written to disk.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Client-supplied file name.
    pub file_name: String,
    /// Declared content type.
    pub content_type: String,
    pub bytes: Bytes,
}

/// Check the declared content type of an upload.
///
/// # Errors
///
/// Returns `UploadError::NotAnImage` unless the type is `image/*`.
pub fn validate_content_type(content_type: Option<&str>) -> Result<&str, UploadError> {
    match content_type {
        Some(ct) if ct.trim().to_ascii_lowercase().starts_with("image/") => Ok(ct),
        _ => Err(UploadError::NotAnImage),
    }
}

/// Read an `image` multipart field into memory, enforcing type and size.
///
/// # Errors
///
/// Returns `UploadError::NotAnImage`, `UploadError::TooLarge`, or
/// `UploadError::Malformed` when the part is rejected.
pub async fn read_image_field(mut field: Field<'_>) -> Result<UploadedImage, UploadError> {
    let content_type = validate_content_type(field.content_type())?.to_owned();
    let file_name = field.file_name().unwrap_or("image").to_owned();

    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if buf.len() + chunk.len() > MAX_IMAGE_BYTES {
            return Err(UploadError::TooLarge);
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(UploadedImage {
        file_name,
        content_type,
        bytes: Bytes::from(buf),
    })
}

/// Replace every character outside `[A-Za-z0-9.-]` with `_`.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Name an upload is stored under.
#[must_use]
pub fn stored_file_name(original: &str, unix_millis: i64) -> String {
    format!("{unix_millis}-{}", sanitize_file_name(original))
}

/// Writes accepted uploads into the upload directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory files are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an image to disk and return its public path (`/uploads/<name>`).
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` if the directory or file cannot be written.
    pub async fn save(&self, image: &UploadedImage) -> Result<String, UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let name = stored_file_name(&image.file_name, Utc::now().timestamp_millis());
        tokio::fs::write(self.dir.join(&name), &image.bytes).await?;

        tracing::info!(
            file = %name,
            bytes = image.bytes.len(),
            content_type = %image.content_type,
            "Stored product image"
        );
        Ok(format!("{PUBLIC_PREFIX}/{name}"))
    }

    /// Delete a file previously returned by [`ImageStore::save`].
    ///
    /// Paths outside `/uploads/` are ignored. Failures are logged, not
    /// returned, since the caller is already unwinding another error.
    pub async fn discard(&self, public_path: &str) {
        let Some(name) = public_path
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains('/'))
        else {
            return;
        };

        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => tracing::info!(file = %name, "Removed orphaned product image"),
            Err(err) => {
                tracing::warn!(error = %err, file = %name, "Failed to remove orphaned product image");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("sofa.jpg"), "sofa.jpg");
        assert_eq!(sanitize_file_name("my sofa (1).png"), "my_sofa__1_.png");
        assert_eq!(sanitize_file_name("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_file_name("café.webp"), "caf_.webp");
    }

    #[test]
    fn test_stored_file_name() {
        assert_eq!(
            stored_file_name("Noir Bed.jpg", 1_767_225_600_000),
            "1767225600000-Noir_Bed.jpg"
        );
    }

    #[test]
    fn test_validate_content_type() {
        assert!(validate_content_type(Some("image/png")).is_ok());
        assert!(validate_content_type(Some("IMAGE/JPEG")).is_ok());
        assert!(matches!(
            validate_content_type(Some("application/pdf")),
            Err(UploadError::NotAnImage)
        ));
        assert!(matches!(
            validate_content_type(None),
            Err(UploadError::NotAnImage)
        ));
    }

    #[tokio::test]
    async fn test_save_writes_into_upload_dir() {
        let dir = std::env::temp_dir().join(format!("velaris-uploads-{}", uuid::Uuid::new_v4()));
        let store = ImageStore::new(&dir);

        let public = store
            .save(&UploadedImage {
                file_name: "chair.png".to_owned(),
                content_type: "image/png".to_owned(),
                bytes: Bytes::from_static(b"\x89PNG"),
            })
            .await
            .unwrap();

        assert!(public.starts_with("/uploads/"));
        assert!(public.ends_with("-chair.png"));
        let name = public.trim_start_matches("/uploads/");
        let written = std::fs::read(dir.join(name)).unwrap();
        assert_eq!(written, b"\x89PNG");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_discard_removes_saved_file_only() {
        let dir = std::env::temp_dir().join(format!("velaris-uploads-{}", uuid::Uuid::new_v4()));
        let store = ImageStore::new(&dir);
        let public = store
            .save(&UploadedImage {
                file_name: "lamp.png".to_owned(),
                content_type: "image/png".to_owned(),
                bytes: Bytes::from_static(b"\x89PNG"),
            })
            .await
            .unwrap();

        // Not ours: left alone, no panic
        store.discard("https://images.example/lamp.png").await;
        store.discard("/uploads/../secret").await;
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);

        store.discard(&public).await;
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_read_image_field_enforces_size_cap() {
        use axum::extract::{DefaultBodyLimit, Multipart};
        use axum::http::{Request, StatusCode};
        use axum::{Router, routing::post};
        use tower::ServiceExt;

        async fn receive(mut multipart: Multipart) -> (StatusCode, String) {
            let Ok(Some(field)) = multipart.next_field().await else {
                return (StatusCode::BAD_REQUEST, String::new());
            };
            match read_image_field(field).await {
                Ok(image) => (StatusCode::OK, image.bytes.len().to_string()),
                Err(UploadError::TooLarge) => (StatusCode::PAYLOAD_TOO_LARGE, String::new()),
                Err(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            }
        }

        async fn send(len: usize) -> (StatusCode, String) {
            let app = Router::new()
                .route("/", post(receive))
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES));

            let boundary = "velaris-boundary";
            let mut body = format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"big.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .into_bytes();
            body.extend(std::iter::repeat_n(0u8, len));
            body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

            let response = app
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/")
                        .header(
                            "content-type",
                            format!("multipart/form-data; boundary={boundary}"),
                        )
                        .body(axum::body::Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            (status, String::from_utf8(bytes.to_vec()).unwrap())
        }

        assert_eq!(
            send(MAX_IMAGE_BYTES).await,
            (StatusCode::OK, MAX_IMAGE_BYTES.to_string())
        );
        assert_eq!(send(MAX_IMAGE_BYTES + 1).await.0, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
