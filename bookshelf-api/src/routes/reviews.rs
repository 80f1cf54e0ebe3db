/// Review endpoints

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
    services::reviews::{CreateReview, ReviewResponse, UpdateReview},
};
use uuid::Uuid;

/// `GET /reviews`
pub async fn list_reviews(
    State(state): State<AppState>,
) -> ApiResult<axum::Json<Vec<ReviewResponse>>> {
    Ok(axum::Json(state.reviews.list().await?))
}

/// `GET /reviews/book/:book_id`
///
/// An unknown book yields an empty list rather than a 404.
pub async fn list_book_reviews(
    State(state): State<AppState>,
    Path(book_id): Path<Uuid>,
) -> ApiResult<axum::Json<Vec<ReviewResponse>>> {
    Ok(axum::Json(state.reviews.list_by_book(book_id).await?))
}

/// `GET /reviews/:id`
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::Json<ReviewResponse>> {
    Ok(axum::Json(state.reviews.get(id).await?))
}

/// Create a review
///
/// # Endpoint
///
/// ```text
/// POST /reviews
/// Authorization: Bearer <token>
///
/// { "content": "Great", "rating": 5, "bookId": "uuid", "userId": "uuid" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failure (rating outside 1..=5, blank content)
/// - `404 Not Found`: the referenced book or user does not exist
pub async fn create_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateReview>,
) -> ApiResult<impl IntoResponse> {
    let id = state.reviews.create(req).await?;

    tracing::info!(review_id = %id, credential_id = %auth.credential_id, "Review created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/reviews/{id}"))],
        axum::Json(CreatedResponse { id }),
    ))
}

/// `PUT /reviews` with the id in the body
pub async fn update_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateReview>,
) -> ApiResult<StatusCode> {
    let id = req.id;
    state.reviews.update(req).await?;

    tracing::info!(review_id = %id, credential_id = %auth.credential_id, "Review updated");

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /reviews/:id`
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.reviews.delete(id).await?;

    tracing::info!(review_id = %id, credential_id = %auth.credential_id, "Review deleted");

    Ok(StatusCode::NO_CONTENT)
}
