/// Review model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE reviews (
///     id UUID PRIMARY KEY,
///     content VARCHAR(1000) NOT NULL,
///     rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
///     book_id UUID NOT NULL REFERENCES books(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT
/// );
/// ```
///
/// Reads return [`ReviewDetail`], which joins in the book title and the
/// author's user name.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A review as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    /// Unique review ID (UUID v4)
    pub id: Uuid,

    /// Review text
    pub content: String,

    /// Rating from 1 to 5
    pub rating: i32,

    /// Reviewed book
    pub book_id: Uuid,

    /// Author of the review
    pub user_id: Uuid,
}

/// A review joined with its book title and author name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewDetail {
    pub id: Uuid,
    pub content: String,
    pub rating: i32,
    pub book_id: Uuid,
    pub book_title: String,
    pub user_id: Uuid,
    pub user_name: String,
}

const DETAIL_SELECT: &str = r#"
    SELECT r.id, r.content, r.rating, r.book_id, b.title AS book_title,
           r.user_id, u.user_name
    FROM reviews r
    JOIN books b ON b.id = r.book_id
    JOIN users u ON u.id = r.user_id
"#;

impl Review {
    /// Builds a review with a fresh id
    pub fn new(content: impl Into<String>, rating: i32, book_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            rating,
            book_id,
            user_id,
        }
    }

    /// Lists every review
    pub async fn list(pool: &PgPool) -> Result<Vec<ReviewDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} ORDER BY r.id");
        sqlx::query_as::<_, ReviewDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Lists the reviews of one book
    pub async fn list_by_book(
        pool: &PgPool,
        book_id: Uuid,
    ) -> Result<Vec<ReviewDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE r.book_id = $1 ORDER BY r.id");
        sqlx::query_as::<_, ReviewDetail>(&query)
            .bind(book_id)
            .fetch_all(pool)
            .await
    }

    /// Finds a review by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ReviewDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE r.id = $1");
        sqlx::query_as::<_, ReviewDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Inserts a review
    ///
    /// # Errors
    ///
    /// Fails with a foreign-key violation if the book or user is missing.
    pub async fn insert(pool: &PgPool, review: &Review) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, content, rating, book_id, user_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(review.id)
        .bind(&review.content)
        .bind(review.rating)
        .bind(review.book_id)
        .bind(review.user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Replaces every mutable column of an existing review
    ///
    /// Returns false if no review has this id.
    pub async fn update(pool: &PgPool, review: &Review) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE reviews
            SET content = $2, rating = $3, book_id = $4, user_id = $5
            WHERE id = $1
            "#,
        )
        .bind(review.id)
        .bind(&review.content)
        .bind(review.rating)
        .bind(review.book_id)
        .bind(review.user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a review
    ///
    /// Returns false if no review has this id.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
