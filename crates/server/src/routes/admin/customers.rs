//! Customers list route handler.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::Customer;
use crate::services::InquiryService;
use crate::state::AppState;

/// Customers, most recent inquiry first.
#[instrument(skip(admin, state), fields(admin = %admin.username))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = InquiryService::new(state.pool()).list_customers().await?;
    Ok(Json(customers))
}
