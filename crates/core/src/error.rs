use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Validate that a value is present in a known list, returning a
/// descriptive error if not.
pub fn validate_known_value(value: &str, valid: &[&str], label: &str) -> Result<(), CoreError> {
    if valid.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {label} '{value}'. Must be one of: {}",
            valid.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn known_value_passes() {
        assert!(validate_known_value("a", &["a", "b"], "letter").is_ok());
    }

    #[test]
    fn unknown_value_lists_choices() {
        let err = validate_known_value("z", &["a", "b"], "letter").unwrap_err();
        assert_matches!(err, CoreError::Validation(ref msg) if msg.contains("a, b"));
    }
}
