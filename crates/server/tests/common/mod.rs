//! Common test utilities for in-process API testing.
//!
//! This module provides a test fixture that builds the full router over
//! SQLite stores in a temporary directory, so handlers are exercised end to
//! end without a listening socket.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use cardcatalog_core::{
    initialize_mtgjson_catalog, CardStore, Catalog, CatalogStore, Config, DatabaseConfig,
    MtgjsonConfig, ServerConfig, SqliteCardStore, SqliteCatalogStore,
};

/// Re-export fixtures for test convenience
pub use cardcatalog_core::testing::fixtures;

/// Test fixture for in-process API testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_set_creation() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/sets", json!({
///         "code": "LEA",
///         "name": "Limited Edition Alpha"
///     })).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Direct access to the catalog store
    pub catalogs: Arc<dyn CatalogStore>,
    /// Direct access to the set and card store
    pub cards: Arc<dyn CardStore>,
    /// The default MTGJSON catalog
    pub mtgjson_catalog: Catalog,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with the default MTGJSON catalog in place.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            mtgjson: MtgjsonConfig {
                initialize_on_startup: true,
                version: Some("5.2.2".to_string()),
            },
        };

        let catalogs: Arc<dyn CatalogStore> = Arc::new(
            SqliteCatalogStore::new(&db_path).expect("Failed to create catalog store"),
        );
        let cards: Arc<dyn CardStore> =
            Arc::new(SqliteCardStore::new(&db_path).expect("Failed to create card store"));

        let (mtgjson_catalog, _) =
            initialize_mtgjson_catalog(catalogs.as_ref(), config.mtgjson.version.as_deref())
                .expect("Failed to initialize MTGJSON catalog");

        let state = Arc::new(cardcatalog_server::state::AppState::new(
            config,
            Arc::clone(&catalogs),
            Arc::clone(&cards),
        ));

        let router = cardcatalog_server::api::create_router(state);

        Self {
            router,
            catalogs,
            cards,
            mtgjson_catalog,
            temp_dir,
        }
    }

    /// API path of the default MTGJSON catalog, e.g. `/api/v1/catalogs/{id}`.
    pub fn mtgjson_path(&self) -> String {
        format!("/api/v1/catalogs/{}", self.mtgjson_catalog.id)
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request without a body or content type.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Fetch the raw text body of a GET request (for non-JSON endpoints).
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
