/// Database models for Bookshelf
///
/// This module contains all database models and their SQL operations.
/// The Postgres repositories in [`crate::repositories::postgres`] delegate to
/// these functions.
///
/// # Models
///
/// - `credential`: Login identities (email + Argon2id hash)
/// - `user`: Application-level user profiles referenced by reviews
/// - `book`: Books in the catalogue
/// - `review`: Reviews of books written by users
///
/// # Example
///
/// ```no_run
/// use bookshelf_shared::models::book::Book;
/// use bookshelf_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let book = Book::new("1984", "George Orwell");
/// Book::insert(&pool, &book).await?;
/// # Ok(())
/// # }
/// ```

pub mod book;
pub mod credential;
pub mod review;
pub mod user;
