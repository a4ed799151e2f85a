//! Common test utilities for API testing with a mock LLM.
//!
//! This module provides a test fixture that creates an in-process server
//! with a [`MockLlmClient`] injected, so the restaurant endpoints and the
//! session socket can be exercised without a Gemini key.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use foodradar_core::{
    testing::MockLlmClient, Config, FetchConfig, FetchPolicy, PickerConfig, RestaurantFetcher,
};
use foodradar_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use foodradar_core::testing::fixtures;

/// Test fixture for API testing with a mock LLM.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_lookup() {
///     let fixture = TestFixture::new().await;
///     fixture.llm.set_text(fixtures::triple_lines(&["Sushi Zen"])).await;
///
///     let response = fixture.get("/api/v1/restaurants?latitude=45.46&longitude=9.19").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock LLM - configure model answers and failures
    pub llm: MockLlmClient,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with the graceful policy.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let llm = MockLlmClient::new();

        let config = Config {
            fetch: FetchConfig {
                policy: test_config.policy,
                demo_latency_ms: 0,
                ..Default::default()
            },
            picker: PickerConfig {
                tick_interval_ms: 1,
                ticks: 15,
            },
            ..Default::default()
        };

        let client = if test_config.demo {
            None
        } else {
            Some(Arc::new(llm.clone()) as Arc<dyn foodradar_core::LlmClient>)
        };
        let fetcher = RestaurantFetcher::new(config.fetch.clone(), client);
        let state = Arc::new(AppState::new(config, fetcher));

        Self {
            router: create_router(state),
            llm,
        }
    }

    /// Serve the router on an ephemeral local port (for WebSocket tests).
    pub async fn serve(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });
        addr
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

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

        (status, String::from_utf8_lossy(&body_bytes).to_string())
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

        let request = request_builder.body(body).unwrap();

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

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Failure policy of the fetcher
    pub policy: FetchPolicy,
    /// Run without an LLM client
    pub demo: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            policy: FetchPolicy::Graceful,
            demo: false,
        }
    }
}

impl TestConfig {
    /// Create config with the strict policy.
    pub fn strict() -> Self {
        Self {
            policy: FetchPolicy::Strict,
            demo: false,
        }
    }

    /// Create config without an LLM client.
    pub fn demo() -> Self {
        Self {
            policy: FetchPolicy::Graceful,
            demo: true,
        }
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
