//! Integration tests for Velaris.
//!
//! Tests drive the complete router in process with
//! `tower::ServiceExt::oneshot`: an in-memory `SQLite` database, the full
//! middleware stack, and throwaway directories for uploads and static
//! assets. No server or external database is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p velaris-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;
use uuid::Uuid;

use velaris_server::config::ServerConfig;
use velaris_server::db;
use velaris_server::routes;
use velaris_server::services::AuthService;
use velaris_server::state::AppState;

/// Username of the admin every context starts with.
pub const ADMIN_USERNAME: &str = "admin";
/// Password of the admin every context starts with.
pub const ADMIN_PASSWORD: &str = "Velaris@123";

/// Marker written into the fallback pages so tests can tell them apart.
pub const PUBLIC_INDEX: &str = "<!doctype html><title>Velaris</title>";
pub const ADMIN_INDEX: &str = "<!doctype html><title>Velaris Admin</title>";

/// A response with its body read to completion.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Body parsed as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }

    /// The `name=value` pair of the session cookie, if one was set.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(velaris_server::middleware::session::SESSION_COOKIE_NAME))
            .and_then(|v| v.split(';').next())
            .map(str::to_owned)
    }
}

/// One isolated application instance.
pub struct TestContext {
    pub app: Router,
    pub pool: SqlitePool,
    pub root: PathBuf,
}

impl TestContext {
    /// Fresh database (migrated, admin ensured, catalog empty) and fresh
    /// directories.
    pub async fn new() -> Self {
        let root = std::env::temp_dir().join(format!("velaris-it-{}", Uuid::new_v4()));
        let public_dir = root.join("public");
        let admin_dir = root.join("admin");
        std::fs::create_dir_all(&public_dir).unwrap();
        std::fs::create_dir_all(&admin_dir).unwrap();
        std::fs::write(public_dir.join("index.html"), PUBLIC_INDEX).unwrap();
        std::fs::write(admin_dir.join("index.html"), ADMIN_INDEX).unwrap();

        let mut config = ServerConfig::for_database("sqlite::memory:");
        config.upload_dir = root.join("uploads");
        config.public_dir = public_dir;
        config.admin_dir = admin_dir;

        // A single connection that never recycles keeps the in-memory
        // database alive for the whole test.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect(config.database_url.expose_secret())
            .await
            .unwrap();
        db::migrate(&pool).await.unwrap();
        AuthService::new(&pool)
            .ensure_admin(ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .unwrap();

        let app = routes::app(AppState::new(config, pool.clone()));

        Self { app, pool, root }
    }

    /// Same as [`TestContext::new`] with the demo catalog loaded.
    pub async fn seeded() -> Self {
        let ctx = Self::new().await;
        db::seed::seed_catalog(&ctx.pool).await.unwrap();
        ctx
    }

    /// Directory uploaded images are written to.
    pub fn upload_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    /// Send a request through the full middleware stack.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// GET with an optional session cookie.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, cookie).body(Body::empty()).unwrap())
            .await
    }

    /// Request with a JSON body.
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: &Value,
    ) -> TestResponse {
        self.send(
            request(method, uri, cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Request with an urlencoded body.
    pub async fn form(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: &str,
    ) -> TestResponse {
        self.send(
            request(method, uri, cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
    }

    /// Request with a multipart body built by [`Multipart`].
    pub async fn multipart(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Multipart,
    ) -> TestResponse {
        self.send(
            request(method, uri, cookie)
                .header(header::CONTENT_TYPE, body.content_type())
                .body(Body::from(body.finish()))
                .unwrap(),
        )
        .await
    }

    /// Log in as the default admin and return the session cookie.
    pub async fn login(&self) -> String {
        let response = self
            .json(
                Method::POST,
                "/api/auth/login",
                None,
                &serde_json::json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        response.session_cookie().unwrap()
    }

    /// Create a product as admin and return its JSON.
    pub async fn create_product(&self, cookie: &str, body: &Value) -> Value {
        let response = self
            .json(Method::POST, "/api/admin/products", Some(cookie), body)
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

fn request(method: Method, uri: &str, cookie: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match cookie {
        Some(cookie) => builder.header(header::COOKIE, cookie),
        None => builder,
    }
}

/// Minimal `multipart/form-data` body builder.
pub struct Multipart {
    boundary: String,
    body: Vec<u8>,
}

impl Default for Multipart {
    fn default() -> Self {
        Self::new()
    }
}

impl Multipart {
    pub fn new() -> Self {
        Self {
            boundary: format!("velaris-{}", Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    /// Add a text field.
    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    /// Add a file part.
    #[must_use]
    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}

/// A complete product body for create calls.
pub fn product_body(name: &str, category: &str) -> Value {
    serde_json::json!({
        "name": name,
        "category": category,
        "description": "Hand-finished piece from the Velaris atelier.",
        "materials": "Solid oak, linen",
        "craftsmanship": "Mortise and tenon joinery",
    })
}

/// Whether a file exists under `dir` for the given public `/uploads/...` path.
pub fn upload_exists(dir: &Path, public_path: &str) -> bool {
    public_path
        .strip_prefix("/uploads/")
        .is_some_and(|name| dir.join(name).is_file())
}
