//! Request body extractors shared by the JSON API.
//!
//! The dashboard and the public site post either JSON or classic HTML forms,
//! and product writes may carry an image as multipart. These extractors
//! normalize all of them into the same typed DTO so handlers never branch on
//! the content type.

use std::collections::HashMap;

use axum::{
    Form, Json,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::services::ProductInput;
use crate::uploads::{UploadError, UploadedImage, read_image_field};

/// Multipart field carrying the product image.
pub const IMAGE_FIELD: &str = "image";

fn content_type(req: &Request) -> String {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Turn flat text fields into a JSON object so form bodies deserialize
/// through the same code path as JSON bodies.
fn fields_to_dto<T: DeserializeOwned>(fields: HashMap<String, String>) -> Result<T, AppError> {
    let object: Map<String, Value> = fields
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    serde_json::from_value(Value::Object(object))
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))
}

async fn json_or_form<T, S>(req: Request, state: &S) -> Result<T, AppError>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    let content_type = content_type(&req);

    if content_type.starts_with("application/json") {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        return Ok(value);
    }

    if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        return fields_to_dto(fields);
    }

    Err(AppError::BadRequest(
        "Expected a JSON or form-encoded body".to_owned(),
    ))
}

/// Body extractor accepting `application/json` or
/// `application/x-www-form-urlencoded`.
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        json_or_form(req, state).await.map(Self)
    }
}

/// Product write body: fields plus an optional validated image.
///
/// Accepts JSON, urlencoded, or `multipart/form-data` with an optional
/// `image` file part. A rejected image fails the whole request.
pub struct ProductPayload {
    pub input: ProductInput,
    pub image: Option<UploadedImage>,
}

impl<S> FromRequest<S> for ProductPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !content_type(&req).starts_with("multipart/form-data") {
            let input = json_or_form(req, state).await?;
            return Ok(Self { input, image: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| UploadError::Malformed(e.body_text()))?;

        let mut fields: HashMap<String, String> = HashMap::new();
        let mut image = None;

        while let Some(field) = multipart.next_field().await.map_err(UploadError::from)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == IMAGE_FIELD && field.file_name().is_some() {
                // Browsers send an empty, unnamed part when no file was chosen
                if field.file_name().is_some_and(str::is_empty) {
                    continue;
                }
                image = Some(read_image_field(field).await?);
            } else {
                let value = field.text().await.map_err(UploadError::from)?;
                fields.insert(name, value);
            }
        }

        Ok(Self {
            input: fields_to_dto(fields)?,
            image,
        })
    }
}
