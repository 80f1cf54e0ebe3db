/// Request validation helpers
///
/// Request types derive [`validator::Validate`]. This module flattens the
/// resulting [`ValidationErrors`] into a list of [`FieldError`]s that can be
/// returned to clients, and provides the custom rules shared by several
/// request types.
///
/// # Example
///
/// ```
/// use bookshelf_shared::validation::{field_errors, not_blank};
/// use validator::Validate;
///
/// #[derive(Validate)]
/// struct Named {
///     #[validate(custom(function = "not_blank"))]
///     name: String,
/// }
///
/// let err = Named { name: "   ".to_string() }.validate().unwrap_err();
/// let errors = field_errors(&err);
/// assert_eq!(errors[0].field, "name");
/// ```

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

/// A single failed validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flattens validator output into field errors, sorted by field name
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut details: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    details.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    details
}

/// Rejects strings that are empty or only whitespace
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

/// Rejects the nil UUID, which clients send when an id is missing
pub fn not_nil(id: &Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::new("nil").with_message(Cow::Borrowed("is required")));
    }
    Ok(())
}
