/// Unit of work: the set of repositories a request works against
///
/// Repositories are wired once, at service-assembly time, through
/// [`UnitOfWorkBuilder`] or one of the backend shortcuts. Cloning a
/// `UnitOfWork` is cheap and shares the underlying repositories.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use bookshelf_shared::repositories::{memory::InMemoryStore, UnitOfWork};
///
/// let store = Arc::new(InMemoryStore::new());
/// let uow = UnitOfWork::builder()
///     .books(store.clone())
///     .reviews(store.clone())
///     .users(store.clone())
///     .credentials(store)
///     .build()
///     .expect("all repositories supplied");
/// ```

use sqlx::PgPool;
use std::sync::Arc;

use super::memory::InMemoryStore;
use super::postgres::{PgBookRepository, PgCredentialStore, PgReviewRepository, PgUserRepository};
use super::{BookRepository, CredentialStore, ReviewRepository, UserRepository};

/// Error returned when a builder is missing a repository
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Unit of work is missing the {0} repository")]
    MissingRepository(&'static str),
}

/// Bundle of repository trait objects
#[derive(Clone)]
pub struct UnitOfWork {
    books: Arc<dyn BookRepository>,
    reviews: Arc<dyn ReviewRepository>,
    users: Arc<dyn UserRepository>,
    credentials: Arc<dyn CredentialStore>,
}

impl UnitOfWork {
    /// Starts an empty builder
    pub fn builder() -> UnitOfWorkBuilder {
        UnitOfWorkBuilder::default()
    }

    /// Postgres repositories sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            books: Arc::new(PgBookRepository::new(pool.clone())),
            reviews: Arc::new(PgReviewRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            credentials: Arc::new(PgCredentialStore::new(pool)),
        }
    }

    /// In-memory repositories sharing one fresh store
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            books: store.clone(),
            reviews: store.clone(),
            users: store.clone(),
            credentials: store,
        }
    }

    pub fn books(&self) -> Arc<dyn BookRepository> {
        self.books.clone()
    }

    pub fn reviews(&self) -> Arc<dyn ReviewRepository> {
        self.reviews.clone()
    }

    pub fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        self.credentials.clone()
    }
}

/// Builder for [`UnitOfWork`]; every repository must be supplied
#[derive(Default)]
pub struct UnitOfWorkBuilder {
    books: Option<Arc<dyn BookRepository>>,
    reviews: Option<Arc<dyn ReviewRepository>>,
    users: Option<Arc<dyn UserRepository>>,
    credentials: Option<Arc<dyn CredentialStore>>,
}

impl UnitOfWorkBuilder {
    pub fn books(mut self, repository: Arc<dyn BookRepository>) -> Self {
        self.books = Some(repository);
        self
    }

    pub fn reviews(mut self, repository: Arc<dyn ReviewRepository>) -> Self {
        self.reviews = Some(repository);
        self
    }

    pub fn users(mut self, repository: Arc<dyn UserRepository>) -> Self {
        self.users = Some(repository);
        self
    }

    pub fn credentials(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(store);
        self
    }

    /// Builds the unit of work
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingRepository`] naming the first repository
    /// that was not supplied.
    pub fn build(self) -> Result<UnitOfWork, BuildError> {
        Ok(UnitOfWork {
            books: self.books.ok_or(BuildError::MissingRepository("book"))?,
            reviews: self.reviews.ok_or(BuildError::MissingRepository("review"))?,
            users: self.users.ok_or(BuildError::MissingRepository("user"))?,
            credentials: self
                .credentials
                .ok_or(BuildError::MissingRepository("credential"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::Book;

    #[test]
    fn test_builder_reports_missing_repository() {
        let store = Arc::new(InMemoryStore::new());
        let result = UnitOfWork::builder()
            .books(store.clone())
            .reviews(store)
            .build();

        assert_eq!(result.err(), Some(BuildError::MissingRepository("user")));
    }

    #[tokio::test]
    async fn test_in_memory_repositories_share_state() {
        let uow = UnitOfWork::in_memory();
        let clone = uow.clone();

        uow.books().insert(&Book::new("1984", "George Orwell")).await.unwrap();
        assert_eq!(clone.books().count().await.unwrap(), 1);
    }
}
