//! Authentication route handlers.
//!
//! Password login for back office admins. The session stores a
//! [`CurrentAdmin`]; logout drops the whole session record.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use super::extract::JsonOrForm;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Handle a login attempt.
///
/// A failed attempt never touches the session, so no cookie is issued.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    JsonOrForm(form): JsonOrForm<LoginForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let admin: CurrentAdmin = match AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(admin) => admin,
        Err(err) => {
            if matches!(err, AuthError::InvalidCredentials) {
                tracing::info!("Login rejected");
            }
            return Err(err.into());
        }
    };

    set_current_admin(&session, &admin)
        .await
        .map_err(AuthError::Session)?;
    set_sentry_user(&admin.id, &admin.username);

    tracing::info!(admin_id = %admin.id, "Admin logged in");
    Ok(Json(json!({ "ok": true, "username": admin.username })))
}

/// Handle logout.
///
/// Always succeeds; a session store failure is only logged.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Json<serde_json::Value> {
    if let Err(err) = clear_current_admin(&session).await {
        tracing::warn!(error = %err, "Failed to clear session on logout");
    }
    clear_sentry_user();

    Json(json!({ "ok": true }))
}

/// Report the admin bound to the current session.
pub async fn me(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    match admin {
        Some(admin) => Json(json!({
            "authenticated": true,
            "admin": { "id": admin.id, "username": admin.username },
        }))
        .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "authenticated": false })),
        )
            .into_response(),
    }
}
