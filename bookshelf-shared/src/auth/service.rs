/// Authentication service: registration and login
///
/// The service owns no state. It is assembled from three capabilities:
/// a [`CredentialStore`], a [`PasswordHasher`] and a [`TokenIssuer`].
///
/// # Registration
///
/// Validates the input, applies the [`PasswordPolicy`], checks that the email
/// is free, hashes the password and stores a new credential. The email check
/// is only a fast path: two concurrent registrations can both pass it, and
/// the loser's insert then fails on the store's unique constraint. Both paths
/// yield [`AuthError::DuplicateEmail`].
///
/// # Login
///
/// Looks up the credential by exact email, verifies the password and issues
/// a token. An unknown email and a wrong password produce the same
/// [`AuthError::InvalidCredentials`] so callers cannot tell them apart. An
/// unknown email is still checked against a placeholder hash, so both
/// failures cost one password verification.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::jwt::{JwtError, TokenIssuer};
use super::password::{PasswordError, PasswordHasher, PasswordPolicy};
use crate::models::credential::{Credential, NewCredential};
use crate::repositories::{CredentialStore, RepositoryError};
use crate::validation::{field_errors, not_blank, FieldError};

/// Error type for authentication operations
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The email already belongs to a credential
    #[error("Email is already registered.")]
    DuplicateEmail,

    /// Unknown email or wrong password
    #[error("Invalid credentials.")]
    InvalidCredentials,

    /// Malformed registration input
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Password rejected by the configured policy
    #[error("{0}")]
    WeakPassword(String),

    /// Credential store failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Hashing or signing failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AuthError {
    fn from(err: RepositoryError) -> Self {
        AuthError::Persistence(err.to_string())
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

/// Registration input; absent fields deserialize as empty and fail validation
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Registration {
    #[validate(
        length(max = 100, message = "First name must not exceed 100 characters"),
        custom(function = "not_blank")
    )]
    pub first_name: String,

    #[validate(
        length(max = 100, message = "Last name must not exceed 100 characters"),
        custom(function = "not_blank")
    )]
    pub last_name: String,

    #[validate(
        email(message = "Email must be a valid email address"),
        length(max = 200, message = "Email must not exceed 200 characters")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub token: String,
}

/// Registration and login
#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    policy: PasswordPolicy,

    /// Verified against when the email is unknown
    dummy_hash: Arc<str>,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        let dummy_hash = match hasher.hash(&Uuid::new_v4().to_string()) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build placeholder password hash");
                String::new()
            }
        };

        Self {
            credentials,
            hasher,
            tokens,
            policy: PasswordPolicy::default(),
            dummy_hash: dummy_hash.into(),
        }
    }

    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Registers a new credential and returns its id
    ///
    /// # Errors
    ///
    /// - `AuthError::Validation` for malformed input
    /// - `AuthError::WeakPassword` when the policy rejects the password
    /// - `AuthError::DuplicateEmail` when the email is taken
    /// - `AuthError::Persistence` / `AuthError::Internal` on infrastructure failure
    pub async fn register(&self, registration: Registration) -> Result<Uuid, AuthError> {
        registration
            .validate()
            .map_err(|e| AuthError::Validation(field_errors(&e)))?;

        self.policy
            .check(&registration.password)
            .map_err(AuthError::WeakPassword)?;

        if self
            .credentials
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            tracing::info!("Registration rejected: email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(&registration.password)?;

        let credential = Credential::new(
            NewCredential {
                first_name: registration.first_name,
                last_name: registration.last_name,
                email: registration.email,
                password_hash,
            },
            Utc::now(),
        );

        match self.credentials.insert(&credential).await {
            Ok(()) => {}
            Err(RepositoryError::UniqueViolation(constraint)) => {
                tracing::info!(
                    constraint = %constraint,
                    "Registration lost a race on a duplicate email"
                );
                return Err(AuthError::DuplicateEmail);
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(credential_id = %credential.id, "Credential registered");

        Ok(credential.id)
    }

    /// Verifies an email and password and issues a token
    ///
    /// # Errors
    ///
    /// `AuthError::InvalidCredentials` for an unknown email or a wrong
    /// password, with no way to tell which.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let credential = match self.credentials.find_by_email(email).await? {
            Some(credential) => credential,
            None => {
                let _ = self.hasher.verify(password, &self.dummy_hash);
                tracing::debug!("Login failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &credential.password_hash)? {
            tracing::debug!("Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&credential)?;

        tracing::info!(credential_id = %credential.id, "Login succeeded");

        Ok(AuthenticatedUser {
            id: credential.id,
            first_name: credential.first_name,
            last_name: credential.last_name,
            email: credential.email,
            token,
        })
    }
}
