//! Validation error types

use std::fmt;

/// Validation error for request bodies and query strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required attributes absent (or null) in the body
    MissingAttributes,

    /// Field exceeds the column width
    TooLong { field: &'static str, max: usize },

    /// Body is not JSON, or a field has the wrong JSON type
    MalformedBody { reason: String },

    /// Query parameter is not an integer in the accepted range
    InvalidQuery { param: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAttributes => write!(
                f,
                "The request body is missing at least one of the required attributes"
            ),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::MalformedBody { reason } => write!(f, "Malformed request body: {}", reason),
            Self::InvalidQuery { .. } => write!(f, "Invalid query parameter"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Unwrap a required body attribute.
pub(crate) fn required<T>(value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingAttributes)
}

/// Check a string against its column width, counted in characters.
pub(crate) fn max_len(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<String, ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value)
}
