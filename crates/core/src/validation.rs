//! Request validation helpers.
//!
//! Input DTOs derive [`validator::Validate`]; handlers call
//! [`validate_input`] to turn field errors into a [`CoreError::Validation`].

use validator::Validate;

use crate::error::CoreError;

/// Run the derived validation rules for `input`.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(errors.to_string()))
}

/// Reject a value that is present but blank (empty or whitespace only).
pub fn require_non_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}
