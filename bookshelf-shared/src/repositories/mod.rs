/// Repository traits and storage backends
///
/// Services never talk to a database directly. They receive trait objects
/// for the repositories they need, bundled in a [`UnitOfWork`]:
///
/// - [`BookRepository`]: books
/// - [`ReviewRepository`]: reviews, read back joined with book title and user name
/// - [`UserRepository`]: application user profiles
/// - [`CredentialStore`]: login identities, unique by email
///
/// # Backends
///
/// - [`postgres`]: sqlx/Postgres, one atomic statement per call
/// - [`memory`]: `RwLock`-guarded maps enforcing the same constraints
///
/// # Example
///
/// ```
/// use bookshelf_shared::repositories::UnitOfWork;
/// use bookshelf_shared::models::book::Book;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let uow = UnitOfWork::in_memory();
/// uow.books().insert(&Book::new("1984", "George Orwell")).await?;
/// assert_eq!(uow.books().list().await?.len(), 1);
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;
pub mod unit_of_work;

pub use unit_of_work::{BuildError, UnitOfWork, UnitOfWorkBuilder};

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    book::Book,
    credential::Credential,
    review::{Review, ReviewDetail},
    user::User,
};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referenced row does not exist
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// Any other storage failure
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();

            if db_err.is_unique_violation() {
                return RepositoryError::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return RepositoryError::ForeignKeyViolation(constraint);
            }
        }

        RepositoryError::Database(err.to_string())
    }
}

/// Book persistence
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books, ordered by title
    async fn list(&self) -> Result<Vec<Book>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, RepositoryError>;

    async fn insert(&self, book: &Book) -> Result<(), RepositoryError>;

    /// Returns false if the book does not exist
    async fn update(&self, book: &Book) -> Result<bool, RepositoryError>;

    /// Deletes the book and its reviews; returns false if it does not exist
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;

    async fn count(&self) -> Result<i64, RepositoryError>;
}

/// Review persistence
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<ReviewDetail>, RepositoryError>;

    async fn list_by_book(&self, book_id: Uuid) -> Result<Vec<ReviewDetail>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReviewDetail>, RepositoryError>;

    /// Fails with [`RepositoryError::ForeignKeyViolation`] if the book or user is missing
    async fn insert(&self, review: &Review) -> Result<(), RepositoryError>;

    /// Returns false if the review does not exist
    async fn update(&self, review: &Review) -> Result<bool, RepositoryError>;

    /// Returns false if the review does not exist
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;
}

/// User profile persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, RepositoryError>;

    /// Fails with [`RepositoryError::UniqueViolation`] if the user name is taken
    async fn insert(&self, user: &User) -> Result<(), RepositoryError>;
}

/// Credential persistence
///
/// Email lookups are exact matches. The store's unique constraint on email is
/// the authoritative guard against duplicates: `insert` must fail with
/// [`RepositoryError::UniqueViolation`] when the email already exists, even if
/// a prior `find_by_email` returned nothing.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Credential>, RepositoryError>;

    async fn insert(&self, credential: &Credential) -> Result<(), RepositoryError>;
}
