/// Review service
///
/// Reviews always reference an existing book and user. On create and update
/// both references are checked up front so a missing one is reported as
/// `NotFound`; a foreign-key violation from the store (the row vanished in
/// between) is reported the same way.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{validate, ServiceError};
use crate::models::review::{Review, ReviewDetail};
use crate::repositories::{BookRepository, RepositoryError, ReviewRepository, UnitOfWork, UserRepository};
use crate::validation::{not_blank, not_nil};

/// Review as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub content: String,
    pub rating: i32,
    pub book_id: Uuid,
    pub book_title: String,
    pub user_id: Uuid,
    pub user_name: String,
}

impl From<ReviewDetail> for ReviewResponse {
    fn from(detail: ReviewDetail) -> Self {
        Self {
            id: detail.id,
            content: detail.content,
            rating: detail.rating,
            book_id: detail.book_id,
            book_title: detail.book_title,
            user_id: detail.user_id,
            user_name: detail.user_name,
        }
    }
}

/// Input for creating a review
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateReview {
    #[validate(
        length(max = 1000, message = "Content must not exceed 1000 characters"),
        custom(function = "not_blank")
    )]
    pub content: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(custom(function = "not_nil"))]
    pub book_id: Uuid,

    #[validate(custom(function = "not_nil"))]
    pub user_id: Uuid,
}

/// Input for replacing a review; the id travels in the body
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateReview {
    #[validate(custom(function = "not_nil"))]
    pub id: Uuid,

    #[validate(
        length(max = 1000, message = "Content must not exceed 1000 characters"),
        custom(function = "not_blank")
    )]
    pub content: String,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(custom(function = "not_nil"))]
    pub book_id: Uuid,

    #[validate(custom(function = "not_nil"))]
    pub user_id: Uuid,
}

#[derive(Clone)]
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    books: Arc<dyn BookRepository>,
    users: Arc<dyn UserRepository>,
}

impl ReviewService {
    pub fn new(uow: &UnitOfWork) -> Self {
        Self {
            reviews: uow.reviews(),
            books: uow.books(),
            users: uow.users(),
        }
    }

    pub async fn list(&self) -> Result<Vec<ReviewResponse>, ServiceError> {
        let reviews = self.reviews.list().await?;
        Ok(reviews.into_iter().map(ReviewResponse::from).collect())
    }

    /// Reviews of one book; empty when the book has none or does not exist
    pub async fn list_by_book(&self, book_id: Uuid) -> Result<Vec<ReviewResponse>, ServiceError> {
        let reviews = self.reviews.list_by_book(book_id).await?;
        Ok(reviews.into_iter().map(ReviewResponse::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<ReviewResponse, ServiceError> {
        self.reviews
            .find_by_id(id)
            .await?
            .map(ReviewResponse::from)
            .ok_or_else(|| ServiceError::not_found("Review", id))
    }

    pub async fn create(&self, request: CreateReview) -> Result<Uuid, ServiceError> {
        validate(&request)?;
        self.check_references(request.book_id, request.user_id).await?;

        let review = Review::new(request.content, request.rating, request.book_id, request.user_id);
        self.reviews
            .insert(&review)
            .await
            .map_err(|e| reference_error(e, request.book_id, request.user_id))?;

        tracing::info!(review_id = %review.id, book_id = %review.book_id, "Review created");
        Ok(review.id)
    }

    pub async fn update(&self, request: UpdateReview) -> Result<(), ServiceError> {
        validate(&request)?;

        if self.reviews.find_by_id(request.id).await?.is_none() {
            return Err(ServiceError::not_found("Review", request.id));
        }
        self.check_references(request.book_id, request.user_id).await?;

        let review = Review {
            id: request.id,
            content: request.content,
            rating: request.rating,
            book_id: request.book_id,
            user_id: request.user_id,
        };

        let updated = self
            .reviews
            .update(&review)
            .await
            .map_err(|e| reference_error(e, review.book_id, review.user_id))?;
        if !updated {
            return Err(ServiceError::not_found("Review", review.id));
        }

        tracing::info!(review_id = %review.id, "Review updated");
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.reviews.delete(id).await? {
            return Err(ServiceError::not_found("Review", id));
        }

        tracing::info!(review_id = %id, "Review deleted");
        Ok(())
    }

    async fn check_references(&self, book_id: Uuid, user_id: Uuid) -> Result<(), ServiceError> {
        if self.books.find_by_id(book_id).await?.is_none() {
            return Err(ServiceError::not_found("Book", book_id));
        }
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ServiceError::not_found("User", user_id));
        }
        Ok(())
    }
}

fn reference_error(err: RepositoryError, book_id: Uuid, user_id: Uuid) -> ServiceError {
    match err {
        RepositoryError::ForeignKeyViolation(constraint) if constraint.contains("user") => {
            ServiceError::not_found("User", user_id)
        }
        RepositoryError::ForeignKeyViolation(_) => ServiceError::not_found("Book", book_id),
        other => other.into(),
    }
}
