//! Public inquiry submission.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::instrument;

use super::extract::JsonOrForm;
use crate::error::AppError;
use crate::services::{InquiryInput, InquiryService};
use crate::state::AppState;

/// Accept a contact form submission.
///
/// The new inquiry's id is not echoed back to the public caller.
#[instrument(skip(state, input))]
pub async fn submit(
    State(state): State<AppState>,
    JsonOrForm(input): JsonOrForm<InquiryInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    InquiryService::new(state.pool()).submit(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "message": "Inquiry submitted successfully" })),
    ))
}
