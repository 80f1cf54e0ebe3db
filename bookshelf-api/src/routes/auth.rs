/// Authentication endpoints
///
/// - `POST /auth/register`: create a credential
/// - `POST /auth/login`: exchange email and password for a bearer token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Json,
    routes::CreatedResponse,
};
use axum::{extract::State, http::StatusCode};
use bookshelf_shared::{
    auth::service::{AuthenticatedUser, Registration},
    validation::{field_errors, not_blank},
};
use serde::Deserialize;
use validator::Validate;

/// Login request
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(custom(function = "not_blank"))]
    pub email: String,

    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

/// Register a new credential
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "firstName": "Jane",
///   "lastName": "Doe",
///   "email": "jane@example.com",
///   "password": "Secret123!"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with `{ "id": "uuid" }`
///
/// # Errors
///
/// - `400 Bad Request`: `validation_error`, or `duplicate_email` when the
///   email is already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<Registration>,
) -> ApiResult<(StatusCode, axum::Json<CreatedResponse>)> {
    let id = state.auth.register(req).await?;

    Ok((StatusCode::CREATED, axum::Json(CreatedResponse { id })))
}

/// Log in
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "email": "jane@example.com", "password": "Secret123!" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "id": "uuid",
///   "firstName": "Jane",
///   "lastName": "Doe",
///   "email": "jane@example.com",
///   "token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: blank email or password
/// - `401 Unauthorized`: `invalid_credentials`, whichever part was wrong
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<axum::Json<AuthenticatedUser>> {
    req.validate()
        .map_err(|e| ApiError::ValidationError(field_errors(&e)))?;

    let user = state.auth.authenticate(&req.email, &req.password).await?;

    Ok(axum::Json(user))
}
