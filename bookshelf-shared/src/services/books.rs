/// Book service
///
/// Books are returned together with their reviews. Listing loads all books
/// and all reviews in two queries and groups the reviews by book.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::reviews::ReviewResponse;
use super::{validate, ServiceError};
use crate::models::book::Book;
use crate::repositories::{BookRepository, ReviewRepository, UnitOfWork};
use crate::validation::{not_blank, not_nil};

/// Book as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub reviews: Vec<ReviewResponse>,
}

impl BookResponse {
    fn new(book: Book, reviews: Vec<ReviewResponse>) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            reviews,
        }
    }
}

/// Input for creating a book
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateBook {
    #[validate(
        length(max = 100, message = "Title must not exceed 100 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,

    #[validate(
        length(max = 100, message = "Author must not exceed 100 characters"),
        custom(function = "not_blank")
    )]
    pub author: String,
}

/// Input for replacing a book; the id travels in the body
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateBook {
    #[validate(custom(function = "not_nil"))]
    pub id: Uuid,

    #[validate(
        length(max = 100, message = "Title must not exceed 100 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,

    #[validate(
        length(max = 100, message = "Author must not exceed 100 characters"),
        custom(function = "not_blank")
    )]
    pub author: String,
}

#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn BookRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl BookService {
    pub fn new(uow: &UnitOfWork) -> Self {
        Self {
            books: uow.books(),
            reviews: uow.reviews(),
        }
    }

    /// All books ordered by title, each with its reviews
    pub async fn list(&self) -> Result<Vec<BookResponse>, ServiceError> {
        let books = self.books.list().await?;

        let mut by_book: HashMap<Uuid, Vec<ReviewResponse>> = HashMap::new();
        for review in self.reviews.list().await? {
            by_book
                .entry(review.book_id)
                .or_default()
                .push(ReviewResponse::from(review));
        }

        Ok(books
            .into_iter()
            .map(|book| {
                let reviews = by_book.remove(&book.id).unwrap_or_default();
                BookResponse::new(book, reviews)
            })
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<BookResponse, ServiceError> {
        let book = self
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Book", id))?;

        let reviews = self.reviews.list_by_book(id).await?;
        Ok(BookResponse::new(
            book,
            reviews.into_iter().map(ReviewResponse::from).collect(),
        ))
    }

    pub async fn create(&self, request: CreateBook) -> Result<Uuid, ServiceError> {
        validate(&request)?;

        let book = Book::new(request.title, request.author);
        self.books.insert(&book).await?;

        tracing::info!(book_id = %book.id, "Book created");
        Ok(book.id)
    }

    pub async fn update(&self, request: UpdateBook) -> Result<(), ServiceError> {
        validate(&request)?;

        let book = Book {
            id: request.id,
            title: request.title,
            author: request.author,
        };
        if !self.books.update(&book).await? {
            return Err(ServiceError::not_found("Book", book.id));
        }

        tracing::info!(book_id = %book.id, "Book updated");
        Ok(())
    }

    /// Deletes a book and, with it, its reviews
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.books.delete(id).await? {
            return Err(ServiceError::not_found("Book", id));
        }

        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }
}
