/// Book endpoints
///
/// Reads are public. Writes require a bearer token; the authenticated
/// credential is only used for logging.

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
    services::books::{BookResponse, CreateBook, UpdateBook},
};
use uuid::Uuid;

/// List all books, each with its reviews
///
/// `GET /books`
pub async fn list_books(State(state): State<AppState>) -> ApiResult<axum::Json<Vec<BookResponse>>> {
    let books = state.books.list().await?;

    Ok(axum::Json(books))
}

/// Get a single book
///
/// `GET /books/:id`
///
/// # Errors
///
/// - `404 Not Found`: no book with that id
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<axum::Json<BookResponse>> {
    let book = state.books.get(id).await?;

    Ok(axum::Json(book))
}

/// Create a book
///
/// # Endpoint
///
/// ```text
/// POST /books
/// Authorization: Bearer <token>
///
/// { "title": "Dune", "author": "Frank Herbert" }
/// ```
///
/// # Response
///
/// `201 Created` with `Location: /books/{id}` and `{ "id": "uuid" }`
pub async fn create_book(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateBook>,
) -> ApiResult<impl IntoResponse> {
    let id = state.books.create(req).await?;

    tracing::info!(book_id = %id, credential_id = %auth.credential_id, "Book created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/books/{id}"))],
        axum::Json(CreatedResponse { id }),
    ))
}

/// Update a book; the id travels in the body
///
/// `PUT /books` returns `204 No Content`.
///
/// # Errors
///
/// - `400 Bad Request`: validation failure
/// - `404 Not Found`: no book with that id
pub async fn update_book(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateBook>,
) -> ApiResult<StatusCode> {
    let id = req.id;
    state.books.update(req).await?;

    tracing::info!(book_id = %id, credential_id = %auth.credential_id, "Book updated");

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a book and its reviews
///
/// `DELETE /books/:id` returns `204 No Content`, or `404` when missing.
pub async fn delete_book(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.books.delete(id).await?;

    tracing::info!(book_id = %id, credential_id = %auth.credential_id, "Book deleted");

    Ok(StatusCode::NO_CONTENT)
}
