/// Postgres-backed repositories
///
/// Thin adapters from the repository traits to the SQL operations on the
/// models. Every call is a single statement, so it commits atomically on its
/// own; there is no explicit save step.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{BookRepository, CredentialStore, RepositoryError, ReviewRepository, UserRepository};
use crate::models::{
    book::Book,
    credential::Credential,
    review::{Review, ReviewDetail},
    user::User,
};

/// Books stored in Postgres
#[derive(Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn list(&self) -> Result<Vec<Book>, RepositoryError> {
        Ok(Book::list(&self.pool).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, RepositoryError> {
        Ok(Book::find_by_id(&self.pool, id).await?)
    }

    async fn insert(&self, book: &Book) -> Result<(), RepositoryError> {
        Ok(Book::insert(&self.pool, book).await?)
    }

    async fn update(&self, book: &Book) -> Result<bool, RepositoryError> {
        Ok(Book::update(&self.pool, book).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(Book::delete(&self.pool, id).await?)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(Book::count(&self.pool).await?)
    }
}

/// Reviews stored in Postgres
#[derive(Clone)]
pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn list(&self) -> Result<Vec<ReviewDetail>, RepositoryError> {
        Ok(Review::list(&self.pool).await?)
    }

    async fn list_by_book(&self, book_id: Uuid) -> Result<Vec<ReviewDetail>, RepositoryError> {
        Ok(Review::list_by_book(&self.pool, book_id).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReviewDetail>, RepositoryError> {
        Ok(Review::find_by_id(&self.pool, id).await?)
    }

    async fn insert(&self, review: &Review) -> Result<(), RepositoryError> {
        Ok(Review::insert(&self.pool, review).await?)
    }

    async fn update(&self, review: &Review) -> Result<bool, RepositoryError> {
        Ok(Review::update(&self.pool, review).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(Review::delete(&self.pool, id).await?)
    }
}

/// User profiles stored in Postgres
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, RepositoryError> {
        Ok(User::find_by_user_name(&self.pool, user_name).await?)
    }

    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        Ok(User::insert(&self.pool, user).await?)
    }
}

/// Credentials stored in Postgres
///
/// Uniqueness is enforced by the `credentials_email_key` constraint.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, RepositoryError> {
        Ok(Credential::find_by_email(&self.pool, email).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Credential>, RepositoryError> {
        Ok(Credential::find_by_id(&self.pool, id).await?)
    }

    async fn insert(&self, credential: &Credential) -> Result<(), RepositoryError> {
        Ok(Credential::insert(&self.pool, credential).await?)
    }
}
