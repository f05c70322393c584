//! Health checks, static serving, fallbacks, and response headers.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use velaris_integration_tests::{ADMIN_INDEX, PUBLIC_INDEX, TestContext};

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;

    let live = ctx.get("/health", None).await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.text(), "ok");

    let ready = ctx.get("/health/ready", None).await;
    assert_eq!(ready.status, StatusCode::OK);

    let api = ctx.get("/api/health", None).await;
    assert_eq!(api.status, StatusCode::OK);
    assert_eq!(api.json(), json!({ "ok": true }));
}

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/api/does-not-exist", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({ "error": "Not found" }));
}

#[tokio::test]
async fn test_unknown_site_paths_fall_back_to_index() {
    let ctx = TestContext::new().await;

    let page = ctx.get("/collections/sofas", None).await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.text(), PUBLIC_INDEX);

    let dashboard = ctx.get("/admin/products/12", None).await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert_eq!(dashboard.text(), ADMIN_INDEX);
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/api/health", None).await;
    assert!(response.headers.contains_key("content-security-policy"));
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
    assert_eq!(response.headers["cache-control"], "no-store, max-age=0");
    assert!(response.headers.contains_key("x-request-id"));

    let page = ctx.get("/", None).await;
    assert!(page.headers.get("cache-control").is_none());
}
