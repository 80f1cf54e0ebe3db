/// User profile endpoints

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{Json, Path},
    routes::CreatedResponse,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Extension,
};
use bookshelf_shared::{
    auth::middleware::AuthContext,
    services::users::{CreateUser, UserResponse},
};
use uuid::Uuid;

/// `GET /users/:id`
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::Json<UserResponse>> {
    Ok(axum::Json(state.users.get(id).await?))
}

/// Create a user profile
///
/// `POST /users` with `{ "userName": "..." }`. Returns `201 Created`, or
/// `409 Conflict` when the user name is taken.
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateUser>,
) -> ApiResult<impl IntoResponse> {
    let id = state.users.create(req).await?;

    tracing::info!(user_id = %id, credential_id = %auth.credential_id, "User created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/users/{id}"))],
        axum::Json(CreatedResponse { id }),
    ))
}
