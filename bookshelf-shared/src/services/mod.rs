/// Catalogue services
///
/// Each service validates its input, talks to repositories from a
/// [`UnitOfWork`](crate::repositories::UnitOfWork) and maps entities to
/// response types. Failures come back as [`ServiceError`].
///
/// - [`books`]: books with their reviews
/// - [`reviews`]: reviews with book title and user name
/// - [`users`]: user profiles

pub mod books;
pub mod reviews;
pub mod users;

use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::repositories::RepositoryError;
use crate::validation::{field_errors, FieldError};

/// Error type for catalogue operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input failed validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Entity does not exist
    #[error("{entity} with id {id} was not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// Write conflicts with existing data
    #[error("{0}")]
    Conflict(String),

    /// Storage failure
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        ServiceError::NotFound { entity, id }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(field_errors(&errors))
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        ServiceError::Persistence(err.to_string())
    }
}

/// Validates a request, converting failures into [`ServiceError::Validation`]
pub(crate) fn validate(request: &impl Validate) -> Result<(), ServiceError> {
    request.validate().map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let id = Uuid::nil();
        let err = ServiceError::not_found("Book", id);
        assert_eq!(
            err.to_string(),
            "Book with id 00000000-0000-0000-0000-000000000000 was not found"
        );
    }

    #[test]
    fn test_repository_errors_are_persistence_errors() {
        let err = ServiceError::from(RepositoryError::Database("connection reset".to_string()));
        assert!(matches!(err, ServiceError::Persistence(msg) if msg.contains("connection reset")));
    }
}
