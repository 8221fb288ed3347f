//! Extractors whose rejections use the error envelope (status 422).

use axum::extract::{FromRequest, FromRequestParts};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::ApiError;

/// JSON body extractor and response.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Query string extractor.
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);

/// Path parameter extractor.
#[derive(Debug, Clone, Copy, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

/// Checks `value` against an inclusive range for a query parameter.
pub fn check_param(name: &str, value: i64, min: i64, max: Option<i64>) -> Result<(), ApiError> {
    let in_range = value >= min && max.is_none_or(|max| value <= max);
    if in_range {
        return Ok(());
    }
    let message = match max {
        Some(max) => format!("{name} must be between {min} and {max}"),
        None => format!("{name} must be at least {min}"),
    };
    Err(ApiError::unprocessable(message))
}
