//! Request context, CORS and compression.

use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::compression::CompressionLayer;
use tower_http::compression::predicate::{DefaultPredicate, Predicate, SizeAbove};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Header carrying the handling time in seconds.
pub const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Origin allowed when not running in debug mode.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8000";

/// Responses smaller than this are sent uncompressed.
pub const MIN_COMPRESS_SIZE: u16 = 1000;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Id of the request being handled, or `"unknown"` outside a request.
pub fn current_request_id() -> String {
    REQUEST_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Assigns a request id, enforces the request timeout, logs the exchange
/// and stamps `X-Request-ID` / `X-Process-Time` on the response.
pub async fn request_context(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let started = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let span = tracing::info_span!(
        "http.request",
        request_id = %request_id,
        method = %method,
        path = %uri.path(),
    );

    let timeout = state.request_timeout();
    let mut response = REQUEST_ID
        .scope(request_id.clone(), async move {
            tracing::info!(uri = %uri, "request started");
            match tokio::time::timeout(timeout, next.run(request)).await {
                Ok(response) => response,
                Err(_) => {
                    tracing::warn!(timeout_secs = timeout.as_secs(), "request timed out");
                    ApiError::timeout().into_response()
                }
            }
        })
        .instrument(span.clone())
        .await;

    let elapsed = started.elapsed();
    span.in_scope(|| {
        tracing::info!(
            status = response.status().as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "request completed"
        );
    });

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&elapsed.as_secs_f64().to_string()) {
        headers.insert(PROCESS_TIME_HEADER, value);
    }
    response
}

/// CORS policy: any origin is mirrored in debug mode, otherwise only the
/// local UI origin is allowed. Credentials are always allowed.
pub fn cors_layer(debug: bool) -> CorsLayer {
    let origin = if debug {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::exact(HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN))
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .expose_headers([
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderName::from_static(PROCESS_TIME_HEADER),
        ])
}

/// Gzip for bodies of at least [`MIN_COMPRESS_SIZE`] bytes.
pub fn compression_layer() -> CompressionLayer<impl Predicate> {
    CompressionLayer::new()
        .gzip(true)
        .compress_when(DefaultPredicate::new().and(SizeAbove::new(MIN_COMPRESS_SIZE)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::Router;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use tower::ServiceExt;
    use trowel_core::config::TrowelConfig;
    use trowel_core::lifecycle::Lifecycle;
    use trowel_store::Store;

    async fn state_with_timeout(secs: u64) -> AppState {
        let mut config = TrowelConfig::default();
        config.database.url = "sqlite::memory:".to_string();
        config.server.request_timeout_secs = secs;
        let store = Store::open(&config.database).await.unwrap();
        AppState::new(store, config, Lifecycle::new("middleware-test"))
    }

    fn router(state: AppState) -> Router {
        Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    "done"
                }),
            )
            .route("/fast", get(|| async { "done" }))
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                request_context,
            ))
            .with_state(state)
    }

    async fn call(router: Router, uri: &str) -> Response {
        let request = axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        router.oneshot(request).await.unwrap()
    }

    // ========================================================================
    // Request id
    // ========================================================================

    #[test]
    fn test_request_id_outside_scope() {
        assert_eq!(current_request_id(), "unknown");
    }

    #[tokio::test]
    async fn test_request_id_inside_scope() {
        let id = REQUEST_ID
            .scope("abc".to_string(), async { current_request_id() })
            .await;
        assert_eq!(id, "abc");
    }

    // ========================================================================
    // Timeout
    // ========================================================================

    #[tokio::test]
    async fn test_slow_handler_times_out_with_envelope() {
        let state = state_with_timeout(1).await;
        let started = Instant::now();
        let response = call(router(state), "/slow").await;
        assert!(started.elapsed() < Duration::from_secs(10));

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let header_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(response.headers().contains_key(PROCESS_TIME_HEADER));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Request timeout");
        assert_eq!(body["status_code"], 408);
        assert_eq!(body["request_id"], header_id.as_str());
    }

    #[tokio::test]
    async fn test_fast_handler_is_not_cut_off() {
        let state = state_with_timeout(1).await;
        let response = call(router(state), "/fast").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }
}
