/// Book model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE books (
///     id UUID PRIMARY KEY,
///     title VARCHAR(100) NOT NULL,
///     author VARCHAR(100) NOT NULL
/// );
/// ```
///
/// Reviews reference books with `ON DELETE CASCADE`, so deleting a book
/// removes its reviews.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A book in the catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Unique book ID (UUID v4)
    pub id: Uuid,

    /// Title
    pub title: String,

    /// Author
    pub author: String,
}

impl Book {
    /// Builds a book with a fresh id
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author: author.into(),
        }
    }

    /// Lists all books ordered by title
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Book>(
            r#"
            SELECT id, title, author
            FROM books
            ORDER BY title, id
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Finds a book by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Book>("SELECT id, title, author FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Inserts a book
    pub async fn insert(pool: &PgPool, book: &Book) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO books (id, title, author) VALUES ($1, $2, $3)")
            .bind(book.id)
            .bind(&book.title)
            .bind(&book.author)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Replaces title and author of an existing book
    ///
    /// Returns false if no book has this id.
    pub async fn update(pool: &PgPool, book: &Book) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author = $3
            WHERE id = $1
            "#,
        )
        .bind(book.id)
        .bind(&book.title)
        .bind(&book.author)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a book and, through the foreign key, its reviews
    ///
    /// Returns false if no book has this id.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts books
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
