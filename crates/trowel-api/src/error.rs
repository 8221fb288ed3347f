//! Error types for trowel-api and the JSON error envelope.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::middleware::current_request_id;

/// Result type alias for trowel-api operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur below the HTTP layer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Error from trowel-core
    #[error(transparent)]
    Core(#[from] trowel_core::Error),

    /// Error from trowel-store
    #[error(transparent)]
    Store(#[from] trowel_store::Error),

    /// Error from trowel-planner
    #[error(transparent)]
    Planner(#[from] trowel_planner::Error),

    /// The blocking planning task panicked or was cancelled.
    #[error("Planning task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Binding or serving failed.
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Core(e) => core_status(e),
            Error::Store(trowel_store::Error::NotFound { .. }) => StatusCode::NOT_FOUND,
            Error::Store(trowel_store::Error::Core(e)) => core_status(e),
            Error::Planner(trowel_planner::Error::Core(e)) => core_status(e),
            Error::Planner(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn core_status(err: &trowel_core::Error) -> StatusCode {
    match err {
        trowel_core::Error::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        trowel_core::Error::Geometry { .. } => StatusCode::BAD_REQUEST,
        trowel_core::Error::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ============================================================================
// ApiError
// ============================================================================

/// A failure rendered as the error envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

/// Body of every error response.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    error: &'a str,
    status_code: u16,
    request_id: String,
    timestamp: f64,
}

impl ApiError {
    /// Error with an explicit status and client-facing message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 404 with `message`.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 422 with `message`.
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// 408 for a request that outlived the configured timeout.
    pub fn timeout() -> Self {
        Self::new(StatusCode::REQUEST_TIMEOUT, "Request timeout")
    }

    /// 500 with the generic message.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    /// Maps `err` to a response; server-side failures are reported as
    /// `"Failed to <operation>"` and their details only logged.
    pub fn from_error(err: Error, operation: &str) -> Self {
        let status = err.status();
        if status.is_server_error() {
            tracing::error!(
                request_id = %current_request_id(),
                operation,
                error = %err,
                "request failed"
            );
            Self::new(status, format!("Failed to {operation}"))
        } else {
            Self::new(status, err.to_string())
        }
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Client-facing message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = current_request_id();
        if self.status.is_server_error() {
            tracing::error!(%request_id, status = self.status.as_u16(), error = %self.message, "HTTP error");
        } else {
            tracing::warn!(%request_id, status = self.status.as_u16(), error = %self.message, "HTTP error");
        }
        let body = Envelope {
            error: &self.message,
            status_code: self.status.as_u16(),
            request_id,
            timestamp: unix_timestamp(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Seconds since the epoch with sub-second precision.
pub fn unix_timestamp() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

macro_rules! from_domain_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for ApiError {
                fn from(err: $ty) -> Self {
                    ApiError::from_error(Error::from(err), "process request")
                }
            }
        )+
    };
}

from_domain_error!(trowel_core::Error, trowel_store::Error, trowel_planner::Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::from_error(err, "process request")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::unprocessable(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::unprocessable(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::unprocessable(rejection.body_text())
    }
}

/// Attaches the operation name used for server-side failure messages.
pub trait FailedTo<T> {
    /// Maps the error with [`ApiError::from_error`].
    fn failed_to(self, operation: &str) -> std::result::Result<T, ApiError>;
}

impl<T, E: Into<Error>> FailedTo<T> for std::result::Result<T, E> {
    fn failed_to(self, operation: &str) -> std::result::Result<T, ApiError> {
        self.map_err(|e| ApiError::from_error(e.into(), operation))
    }
}
