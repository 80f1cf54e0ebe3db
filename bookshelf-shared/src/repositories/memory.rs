/// In-memory repositories
///
/// A single [`InMemoryStore`] implements every repository trait over shared
/// tables behind a `tokio::sync::RwLock`. It enforces the same rules as the
/// Postgres schema: unique credential emails and user names, review foreign
/// keys, and cascading review deletion when a book is deleted.
///
/// Used by the test suites and for running the API without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookRepository, CredentialStore, RepositoryError, ReviewRepository, UserRepository};
use crate::models::{
    book::Book,
    credential::Credential,
    review::{Review, ReviewDetail},
    user::User,
};

#[derive(Debug, Default)]
struct Tables {
    books: HashMap<Uuid, Book>,
    reviews: HashMap<Uuid, Review>,
    users: HashMap<Uuid, User>,
    credentials: HashMap<Uuid, Credential>,
}

impl Tables {
    fn detail(&self, review: &Review) -> Option<ReviewDetail> {
        let book = self.books.get(&review.book_id)?;
        let user = self.users.get(&review.user_id)?;

        Some(ReviewDetail {
            id: review.id,
            content: review.content.clone(),
            rating: review.rating,
            book_id: book.id,
            book_title: book.title.clone(),
            user_id: user.id,
            user_name: user.user_name.clone(),
        })
    }

    fn details<'a>(&self, reviews: impl Iterator<Item = &'a Review>) -> Vec<ReviewDetail> {
        let mut details: Vec<ReviewDetail> = reviews.filter_map(|r| self.detail(r)).collect();
        details.sort_by_key(|d| d.id);
        details
    }

    fn check_references(&self, review: &Review) -> Result<(), RepositoryError> {
        if !self.books.contains_key(&review.book_id) {
            return Err(RepositoryError::ForeignKeyViolation(
                "reviews_book_id_fkey".to_string(),
            ));
        }
        if !self.users.contains_key(&review.user_id) {
            return Err(RepositoryError::ForeignKeyViolation(
                "reviews_user_id_fkey".to_string(),
            ));
        }
        Ok(())
    }
}

/// Shared in-memory tables; clones see the same data
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Book>, RepositoryError> {
        let tables = self.tables.read().await;
        let mut books: Vec<Book> = tables.books.values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        Ok(books)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, RepositoryError> {
        Ok(self.tables.read().await.books.get(&id).cloned())
    }

    async fn insert(&self, book: &Book) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.books.contains_key(&book.id) {
            return Err(RepositoryError::UniqueViolation("books_pkey".to_string()));
        }
        tables.books.insert(book.id, book.clone());
        Ok(())
    }

    async fn update(&self, book: &Book) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.books.get_mut(&book.id) {
            Some(existing) => {
                *existing = book.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.books.remove(&id).is_none() {
            return Ok(false);
        }
        tables.reviews.retain(|_, review| review.book_id != id);
        Ok(true)
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        Ok(self.tables.read().await.books.len() as i64)
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<ReviewDetail>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.details(tables.reviews.values()))
    }

    async fn list_by_book(&self, book_id: Uuid) -> Result<Vec<ReviewDetail>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.details(tables.reviews.values().filter(|r| r.book_id == book_id)))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReviewDetail>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.reviews.get(&id).and_then(|r| tables.detail(r)))
    }

    async fn insert(&self, review: &Review) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        tables.check_references(review)?;
        if tables.reviews.contains_key(&review.id) {
            return Err(RepositoryError::UniqueViolation("reviews_pkey".to_string()));
        }
        tables.reviews.insert(review.id, review.clone());
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.reviews.contains_key(&review.id) {
            return Ok(false);
        }
        tables.check_references(review)?;
        tables.reviews.insert(review.id, review.clone());
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.tables.write().await.reviews.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.user_name == user_name)
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.user_name == user.user_name) {
            return Err(RepositoryError::UniqueViolation(
                "users_user_name_key".to_string(),
            ));
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credential>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .credentials
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Credential>, RepositoryError> {
        Ok(self.tables.read().await.credentials.get(&id).cloned())
    }

    async fn insert(&self, credential: &Credential) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.credentials.values().any(|c| c.email == credential.email) {
            return Err(RepositoryError::UniqueViolation(
                "credentials_email_key".to_string(),
            ));
        }
        tables.credentials.insert(credential.id, credential.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::credential::NewCredential;
    use chrono::Utc;

    fn credential(email: &str) -> Credential {
        Credential::new(
            NewCredential {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
            },
            Utc::now(),
        )
    }

    async fn seeded() -> (InMemoryStore, Book, User) {
        let store = InMemoryStore::new();
        let book = Book::new("1984", "George Orwell");
        let user = User::new("john_smith");
        BookRepository::insert(&store, &book).await.unwrap();
        UserRepository::insert(&store, &user).await.unwrap();
        (store, book, user)
    }

    #[tokio::test]
    async fn test_credential_email_is_unique() {
        let store = InMemoryStore::new();
        CredentialStore::insert(&store, &credential("jane@example.com"))
            .await
            .unwrap();

        let result = CredentialStore::insert(&store, &credential("jane@example.com")).await;
        assert!(matches!(result, Err(RepositoryError::UniqueViolation(_))));
    }

    #[tokio::test]
    async fn test_credential_email_match_is_exact() {
        let store = InMemoryStore::new();
        CredentialStore::insert(&store, &credential("jane@example.com"))
            .await
            .unwrap();

        assert!(store.find_by_email("Jane@example.com").await.unwrap().is_none());
        assert!(CredentialStore::insert(&store, &credential("Jane@example.com"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_review_requires_existing_book_and_user() {
        let (store, book, user) = seeded().await;

        let orphan = Review::new("Great", 5, Uuid::new_v4(), user.id);
        let result = ReviewRepository::insert(&store, &orphan).await;
        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));

        let anonymous = Review::new("Great", 5, book.id, Uuid::new_v4());
        let result = ReviewRepository::insert(&store, &anonymous).await;
        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
    }

    #[tokio::test]
    async fn test_review_detail_joins_title_and_user_name() {
        let (store, book, user) = seeded().await;
        let review = Review::new("Thought-provoking and chilling.", 4, book.id, user.id);
        ReviewRepository::insert(&store, &review).await.unwrap();

        let detail = ReviewRepository::find_by_id(&store, review.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.book_title, "1984");
        assert_eq!(detail.user_name, "john_smith");
    }

    #[tokio::test]
    async fn test_deleting_book_cascades_to_reviews() {
        let (store, book, user) = seeded().await;
        let review = Review::new("Chilling.", 4, book.id, user.id);
        ReviewRepository::insert(&store, &review).await.unwrap();

        assert!(BookRepository::delete(&store, book.id).await.unwrap());
        assert!(ReviewRepository::list(&store).await.unwrap().is_empty());
        assert!(!BookRepository::delete(&store, book.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_user_name_rejected() {
        let (store, _, _) = seeded().await;
        let result = UserRepository::insert(&store, &User::new("john_smith")).await;
        assert!(matches!(result, Err(RepositoryError::UniqueViolation(_))));
    }
}
