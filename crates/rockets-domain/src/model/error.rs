//! Validation errors raised by entity constructors and setters

use thiserror::Error;

/// Errors that can occur while building or mutating an entity
///
/// Validation errors are programming errors on the caller's side:
/// they are raised at the point of construction or mutation and are
/// never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required attribute was not supplied
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// A required string attribute was empty or blank
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    /// A value broke a domain rule (format, range, enumeration)
    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// A cross-field rule was broken
    #[error("inconsistent {field}: {reason}")]
    InconsistentState { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    pub fn inconsistent(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InconsistentState {
            field,
            reason: reason.into(),
        }
    }
}

/// Reject blank strings, returning the value untouched otherwise
pub(crate) fn non_blank(field: &'static str, value: impl Into<String>) -> Result<String, ValidationError> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(value)
}
