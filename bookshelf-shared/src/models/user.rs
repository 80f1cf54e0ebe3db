/// User profile model and database operations
///
/// Users are the application-level profiles that author reviews. They are
/// distinct from [`Credential`](super::credential::Credential)s and may
/// optionally be linked to one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     user_name VARCHAR(50) NOT NULL,
///     is_verified BOOLEAN NOT NULL DEFAULT FALSE,
///     credential_id UUID REFERENCES credentials(id) ON DELETE RESTRICT,
///     CONSTRAINT users_user_name_key UNIQUE (user_name),
///     CONSTRAINT users_credential_id_key UNIQUE (credential_id)
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Application-level user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Public user name, unique
    pub user_name: String,

    /// Whether the profile has been verified
    pub is_verified: bool,

    /// Linked login identity, if any
    pub credential_id: Option<Uuid>,
}

impl User {
    /// Builds an unverified, unlinked user with a fresh id
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_name: user_name.into(),
            is_verified: false,
            credential_id: None,
        }
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, user_name, is_verified, credential_id
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by exact user name
    pub async fn find_by_user_name(
        pool: &PgPool,
        user_name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, user_name, is_verified, credential_id
            FROM users
            WHERE user_name = $1
            "#,
        )
        .bind(user_name)
        .fetch_optional(pool)
        .await
    }

    /// Inserts a user
    ///
    /// # Errors
    ///
    /// Fails on the `users_user_name_key` constraint when the name is taken.
    pub async fn insert(pool: &PgPool, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (id, user_name, is_verified, credential_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id)
        .bind(&user.user_name)
        .bind(user.is_verified)
        .bind(user.credential_id)
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("jane_doe");
        assert_eq!(user.user_name, "jane_doe");
        assert!(!user.is_verified);
        assert!(user.credential_id.is_none());
    }
}
