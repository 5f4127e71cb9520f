//! Input validation failures shared by catalog, cart and request flows.

use super::email::EmailError;

/// A rejected user input. Nothing has been written when one of these is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("cart is empty")]
    EmptyCart,

    #[error("unsupported image type {0}; only JPEG and PNG are accepted")]
    UnsupportedImage(String),

    #[error("{field} is too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },
}

/// Trimmed copy of a required text field.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when the value is blank.
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Like [`required`], with an upper bound on length.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] or [`ValidationError::TooLong`].
pub fn required_bounded(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let value = required(field, value)?;
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("title", "  Luna ").as_deref(), Ok("Luna"));
    }

    #[test]
    fn test_required_rejects_blank() {
        assert_eq!(
            required("title", " \t"),
            Err(ValidationError::MissingField("title"))
        );
    }

    #[test]
    fn test_required_bounded() {
        assert!(required_bounded("name", "abc", 3).is_ok());
        assert_eq!(
            required_bounded("name", "abcd", 3),
            Err(ValidationError::TooLong { field: "name", max: 3 })
        );
    }
}
