/// Extractors whose rejections render as [`ApiError`] JSON bodies
///
/// Axum's stock `Json` and `Path` reject with plain-text bodies; these
/// wrappers keep every error response in the same shape.

use crate::error::ApiError;
use axum::extract::{rejection::PathRejection, FromRequest, FromRequestParts};

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

/// Path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
