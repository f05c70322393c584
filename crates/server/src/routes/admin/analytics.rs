//! Dashboard analytics handler.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::db::AnalyticsRepository;
use crate::db::analytics::AnalyticsSnapshot;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Live dashboard counters.
#[instrument(skip(admin, state), fields(admin = %admin.username))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsSnapshot>, AppError> {
    let snapshot = AnalyticsRepository::new(state.pool()).snapshot().await?;
    Ok(Json(snapshot))
}
