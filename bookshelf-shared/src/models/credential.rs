/// Credential model and database operations
///
/// A credential is the persisted login identity of a person: their email,
/// display names and Argon2id password hash. It is separate from the
/// application-level [`User`](super::user::User) profile.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE credentials (
///     id UUID PRIMARY KEY,
///     first_name VARCHAR(100) NOT NULL,
///     last_name VARCHAR(100) NOT NULL,
///     email VARCHAR(200) NOT NULL,
///     password_hash VARCHAR(256) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL,
///     updated_at TIMESTAMPTZ NOT NULL,
///     CONSTRAINT credentials_email_key UNIQUE (email)
/// );
/// ```
///
/// Email comparison is exact (case-sensitive): `Jane@example.com` and
/// `jane@example.com` are two different credentials.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Persisted login identity
///
/// The password hash is skipped when serializing so a credential can never
/// leak it through a JSON response or log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Credential {
    /// Unique credential ID (UUID v4), immutable
    pub id: Uuid,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address, unique across all credentials
    pub email: String,

    /// Argon2id password hash in PHC string format
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// When the credential was created
    pub created_at: DateTime<Utc>,

    /// When the credential was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a credential
#[derive(Debug, Clone)]
pub struct NewCredential {
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
}

impl Credential {
    /// Builds a credential with a fresh id and both timestamps set to `now`
    pub fn new(data: NewCredential, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            password_hash: data.password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    /// Inserts a credential
    ///
    /// # Errors
    ///
    /// Returns a database error carrying the `credentials_email_key`
    /// constraint if the email is already registered.
    pub async fn insert(pool: &PgPool, credential: &Credential) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO credentials (id, first_name, last_name, email, password_hash,
                                     created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(credential.id)
        .bind(&credential.first_name)
        .bind(&credential.last_name)
        .bind(&credential.email)
        .bind(&credential.password_hash)
        .bind(credential.created_at)
        .bind(credential.updated_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Finds a credential by exact email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, created_at, updated_at
            FROM credentials
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(credential)
    }

    /// Finds a credential by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, created_at, updated_at
            FROM credentials
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(credential)
    }
}
