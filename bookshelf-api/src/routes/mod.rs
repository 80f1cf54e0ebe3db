/// API route handlers
///
/// Handlers are grouped by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `books`: Book CRUD
/// - `reviews`: Review CRUD and per-book listing
/// - `users`: User profiles

pub mod auth;
pub mod books;
pub mod health;
pub mod reviews;
pub mod users;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of every `201 Created` response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}
