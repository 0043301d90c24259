// Validation utilities module
// Custom validators used by the request DTOs

use std::borrow::Cow;
use validator::ValidationError;

/// Rejects empty strings and strings made only of whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("must not be blank"));
        Err(error)
    } else {
        Ok(())
    }
}
