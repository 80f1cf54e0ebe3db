/// Error handling for the API server
///
/// All handlers return `Result<T, ApiError>`, which renders as a JSON body:
///
/// ```json
/// { "error": "not_found", "message": "Book with id ... was not found" }
/// ```
///
/// Validation failures add `details` (one entry per failed field rule), and
/// internal errors add an `error_id` that is also written to the log.
///
/// # Example
///
/// ```
/// use bookshelf_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler(name: Option<String>) -> ApiResult<Json<String>> {
///     let name = name.ok_or_else(|| ApiError::BadRequest("name is required".to_string()))?;
///     Ok(Json(name))
/// }
/// ```

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookshelf_shared::{
    auth::{middleware::BearerError, service::AuthError},
    repositories::RepositoryError,
    services::ServiceError,
    validation::FieldError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. a taken user name
    Conflict(String),

    /// Validation errors (400)
    ValidationError(Vec<FieldError>),

    /// Registration with a taken email (400)
    DuplicateEmail,

    /// Login failure (401); identical for unknown email and wrong password
    InvalidCredentials,

    /// Internal server error (500)
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Per-field validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,

    /// Correlates an internal error with the server log
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_id: Option<Uuid>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::DuplicateEmail => write!(f, "{}", AuthError::DuplicateEmail),
            ApiError::InvalidCredentials => write!(f, "{}", AuthError::InvalidCredentials),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut error_id = None;

        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                "duplicate_email",
                AuthError::DuplicateEmail.to_string(),
                None,
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                AuthError::InvalidCredentials.to_string(),
                None,
            ),
            ApiError::InternalError(msg) => {
                // Details stay in the log; the client only gets the id
                let id = Uuid::new_v4();
                tracing::error!(error_id = %id, "Internal error: {}", msg);
                error_id = Some(id);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
            error_id,
        });

        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => ApiError::ValidationError(errors),
            ServiceError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Persistence(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail => ApiError::DuplicateEmail,
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Validation(errors) => ApiError::ValidationError(errors),
            AuthError::WeakPassword(msg) => {
                ApiError::ValidationError(vec![FieldError::new("password", msg)])
            }
            AuthError::Persistence(msg) | AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<BearerError> for ApiError {
    fn from(err: BearerError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

/// Malformed JSON bodies
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
