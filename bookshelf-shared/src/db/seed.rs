/// Sample catalogue data
///
/// Inserts two users, two books and one review per book. Seeding only runs
/// against a catalogue without books, so restarting with seeding enabled is
/// safe. Sample users that already exist by name are reused.

use crate::models::{book::Book, review::Review, user::User};
use crate::repositories::{RepositoryError, UnitOfWork};

/// Returns the stored user with the same name, inserting `user` if none
async fn existing_or_insert(uow: &UnitOfWork, user: User) -> Result<User, RepositoryError> {
    if let Some(existing) = uow.users().find_by_user_name(&user.user_name).await? {
        tracing::debug!(user_name = %existing.user_name, "Seed user already exists");
        return Ok(existing);
    }

    uow.users().insert(&user).await?;
    Ok(user)
}

/// Seeds the catalogue if it has no books
///
/// Returns `true` if data was inserted.
pub async fn seed_if_empty(uow: &UnitOfWork) -> Result<bool, RepositoryError> {
    if uow.books().count().await? > 0 {
        tracing::debug!("Catalogue already has books, skipping seed data");
        return Ok(false);
    }

    let mut jane = User::new("jane_doe");
    jane.is_verified = true;
    let jane = existing_or_insert(uow, jane).await?;
    let john = existing_or_insert(uow, User::new("john_smith")).await?;

    let gatsby = Book::new("The Great Gatsby", "F. Scott Fitzgerald");
    let nineteen_eighty_four = Book::new("1984", "George Orwell");

    let reviews = [
        Review::new("An amazing read with deep meaning.", 5, gatsby.id, jane.id),
        Review::new("Thought-provoking and chilling.", 4, nineteen_eighty_four.id, john.id),
    ];

    for book in [&gatsby, &nineteen_eighty_four] {
        uow.books().insert(book).await?;
    }
    for review in &reviews {
        uow.reviews().insert(review).await?;
    }

    tracing::info!(books = 2, reviews = reviews.len(), "Seed data inserted");
    Ok(true)
}
