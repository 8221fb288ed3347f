//! Common test utilities and harness for trowel-api integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use trowel_api::{AppState, Server};
use trowel_core::config::TrowelConfig;
use trowel_core::lifecycle::{Lifecycle, ServiceState};
use trowel_store::Store;

/// A response with its body decoded as JSON (`Null` when empty or not JSON).
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
    pub json: Value,
}

impl TestResponse {
    /// Header value as a string.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Test harness owning a router over an in-memory database.
pub struct TestHarness {
    pub router: Router,
    pub state: AppState,
    /// Keeps the static directory alive
    pub static_dir: TempDir,
}

impl TestHarness {
    /// Fresh server state with default configuration.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Fresh server state with `adjust` applied to the configuration.
    pub async fn with_config(adjust: impl FnOnce(&mut TrowelConfig)) -> Self {
        let static_dir = TempDir::new().unwrap();
        let mut config = TrowelConfig::default();
        config.database.url = "sqlite::memory:".to_string();
        config.server.static_dir = static_dir.path().to_path_buf();
        adjust(&mut config);

        let store = Store::open(&config.database).await.unwrap();
        let lifecycle = Lifecycle::new("trowel-api-test");
        lifecycle.set_state(ServiceState::Ready);
        let server = Server::with_store(store, config, lifecycle);
        Self {
            router: server.router(),
            state: server.state().clone(),
            static_dir,
        }
    }

    /// Sends a request with optional JSON body and extra headers.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            text,
            json,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, &[]).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body), &[]).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), &[]).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None, &[]).await
    }

    /// Creates a wall through the API and returns its id.
    pub async fn create_wall(&self, name: &str, width: f64, height: f64) -> i64 {
        let response = self
            .post(
                "/api/v1/walls",
                json!({"name": name, "width": width, "height": height}),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text);
        response.json["id"].as_i64().unwrap()
    }

    /// Plans a trajectory through the API and returns the planning result.
    pub async fn plan(&self, wall_id: i64, algorithm: &str) -> Value {
        let response = self
            .post(
                "/api/v1/planning/plan",
                json!({
                    "wall_id": wall_id,
                    "algorithm": algorithm,
                    "robot_width": 0.1,
                    "overlap_percentage": 20.0,
                    "resolution": 0.05
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text);
        response.json
    }
}

/// Asserts that `response` is an error envelope with `status` and `message`.
pub fn assert_envelope(response: &TestResponse, status: StatusCode, message: &str) {
    assert_eq!(response.status, status, "{}", response.text);
    assert_eq!(response.json["error"], message);
    assert_eq!(response.json["status_code"], status.as_u16());
    assert!(response.json["request_id"].is_string());
    assert!(response.json["timestamp"].is_f64());
}
