//! HTTP route handlers for the catalog site and back office.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Public API
//! GET  /api/health             - {"ok": true}
//! GET  /api/products           - Product listing (?category=&featured=&includeHidden=)
//! GET  /api/products/{id}      - Product detail
//! GET  /api/products/slug/{slug} - Product detail by slug
//! POST /api/inquiries          - Submit an inquiry (JSON or form)
//!
//! # Auth
//! POST /api/auth/login         - Password login
//! POST /api/auth/logout        - Logout
//! GET  /api/auth/me            - Current admin
//!
//! # Back office (requires admin session)
//! GET    /api/admin/products       - All products, hidden included
//! POST   /api/admin/products       - Create product (JSON, form or multipart)
//! GET    /api/admin/products/{id}  - Product detail
//! PUT    /api/admin/products/{id}  - Update product (JSON, form or multipart)
//! DELETE /api/admin/products/{id}  - Delete product
//! GET    /api/admin/inquiries      - Inquiries, newest first
//! PATCH  /api/admin/inquiries/{id} - Change inquiry status
//! GET    /api/admin/customers      - Customers, most recent inquiry first
//! GET    /api/admin/analytics      - Dashboard counters
//!
//! # Static
//! GET  /uploads/*              - Uploaded product images
//! GET  /admin/*                - Back office dashboard (index.html fallback)
//! GET  /*                      - Public site (index.html fallback)
//! ```

pub mod admin;
pub mod auth;
pub mod extract;
pub mod health;
pub mod inquiries;
pub mod products;

use std::str::FromStr;

use axum::{
    Router,
    http::{Request, Response, StatusCode},
    middleware::from_fn,
    routing::{get, post},
};
use serde_json::json;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::middleware::{
    inquiry_rate_limiter, login_rate_limiter, request_id_middleware, security_headers_middleware,
    with_sessions,
};
use crate::state::AppState;
use crate::uploads::PUBLIC_PREFIX;

/// Parse an id path segment. Anything that is not an integer names no
/// record, so it is reported as not found.
pub(crate) fn parse_id<T>(raw: &str, entity: &str) -> Result<T, AppError>
where
    T: From<i64>,
{
    i64::from_str(raw.trim())
        .map(T::from)
        .map_err(|_| AppError::NotFound(entity.to_owned()))
}

/// Login routes, rate limited per client IP when enabled.
fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let login = if rate_limit {
        post(auth::login).layer(login_rate_limiter())
    } else {
        post(auth::login)
    };

    Router::new()
        .route("/login", login)
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Public catalog and inquiry routes.
fn public_routes(rate_limit: bool) -> Router<AppState> {
    let submit = if rate_limit {
        post(inquiries::submit).layer(inquiry_rate_limiter())
    } else {
        post(inquiries::submit)
    };

    Router::new()
        .route("/health", get(health::api_health))
        .route("/products", get(products::index))
        .route("/products/slug/{slug}", get(products::show_by_slug))
        .route("/products/{id}", get(products::show))
        .route("/inquiries", submit)
}

/// Everything under `/api`, with a JSON 404 for unknown paths.
pub fn api_routes(rate_limit: bool) -> Router<AppState> {
    Router::new()
        .merge(public_routes(rate_limit))
        .nest("/auth", auth_routes(rate_limit))
        .nest("/admin", admin::routes())
        .fallback(api_not_found)
}

async fn api_not_found() -> (StatusCode, axum::Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        axum::Json(json!({ "error": "Not found" })),
    )
}

/// Build the complete application: API, static directories, and the
/// middleware stack.
///
/// Used by the binary and by the integration tests.
pub fn app(state: AppState) -> Router {
    let config = state.config();

    let uploads = ServeDir::new(&config.upload_dir);
    let admin_site = ServeDir::new(&config.admin_dir)
        .fallback(ServeFile::new(config.admin_dir.join("index.html")));
    let public_site = ServeDir::new(&config.public_dir)
        .fallback(ServeFile::new(config.public_dir.join("index.html")));

    let router = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes(config.rate_limit))
        .nest_service(PUBLIC_PREFIX, uploads)
        .nest_service("/admin", admin_site)
        .fallback_service(public_site);

    with_sessions(router, state.pool(), config)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: std::time::Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
