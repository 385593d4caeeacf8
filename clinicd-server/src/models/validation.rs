//! Field-level validation errors
//!
//! Payload validators are pure: they take an untyped request body and
//! either narrow it to a typed value or return every failing field at
//! once, so a client sees the full list in one round trip.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Syntactic email check. Intentionally loose: one `@`, no whitespace,
/// a dot somewhere in the domain.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

/// A single failed constraint on a request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field is below minimum length
    TooShort { field: &'static str, min: usize },

    /// Field doesn't look like an email address
    InvalidEmail { field: &'static str },

    /// Numeric field outside its allowed range
    OutOfRange {
        field: &'static str,
        min: i32,
        max: i32,
    },

    /// Invalid enum variant
    InvalidVariant { field: &'static str, value: String },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} must not be empty", field),
            Self::TooShort { field, min } => {
                write!(f, "{} must be at least {} characters", field, min)
            }
            Self::InvalidEmail { field } => write!(f, "{} is not a valid email address", field),
            Self::OutOfRange { field, min, max } => {
                write!(f, "{} must be between {} and {}", field, min, max)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// Minimum-length check, counted in characters.
pub fn check_min_len(field: &'static str, value: &str, min: usize) -> Result<(), FieldError> {
    if value.chars().count() < min {
        Err(FieldError::TooShort { field, min })
    } else {
        Ok(())
    }
}

/// Non-empty check (whitespace-only counts as empty).
pub fn check_not_empty(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        Err(FieldError::Empty { field })
    } else {
        Ok(())
    }
}

/// Syntactic email format check.
pub fn check_email(field: &'static str, value: &str) -> Result<(), FieldError> {
    if EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(FieldError::InvalidEmail { field })
    }
}
