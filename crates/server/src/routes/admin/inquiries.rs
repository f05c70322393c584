//! Inquiry management handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use velaris_core::InquiryId;

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::{Inquiry, InquiryWithCategory};
use crate::routes::extract::JsonOrForm;
use crate::routes::parse_id;
use crate::services::{InquiryService, StatusInput};
use crate::state::AppState;

/// All inquiries, newest first, with the product category when the product
/// still exists.
#[instrument(skip(admin, state), fields(admin = %admin.username))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<InquiryWithCategory>>, AppError> {
    let inquiries = InquiryService::new(state.pool()).list().await?;
    Ok(Json(inquiries))
}

/// Change the status of one inquiry.
#[instrument(skip(admin, state, input), fields(admin = %admin.username))]
pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonOrForm(input): JsonOrForm<StatusInput>,
) -> Result<Json<Inquiry>, AppError> {
    let id: InquiryId = parse_id(&id, "Inquiry")?;
    let inquiry = InquiryService::new(state.pool())
        .update_status(id, &input)
        .await?;
    Ok(Json(inquiry))
}
