//! Errors raised by domain rules before anything touches the store.
//!
//! [`ValidationError`] describes a single bad field. [`CoreError`] covers
//! rules that span a whole request, such as a sale whose submitted total
//! disagrees with its lines. Both become HTTP 400 in `buttery-api`; storage
//! failures live in `buttery_db::DbError`.

use thiserror::Error;

/// Request-level rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A sale was submitted without line items.
    #[error("A sale must contain at least one item")]
    EmptySale,

    /// Sale has more lines than allowed.
    #[error("A sale cannot have more than {max} items")]
    TooManyItems { max: usize },

    #[error("Quantity {requested} is above the limit of {max}")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A client total of 900 against lines `[10 x 100]` yields
    /// `TotalMismatch { computed: 1000, submitted: 900 }`.
    #[error("Submitted total {submitted} does not match computed total {computed}")]
    TotalMismatch { computed: i64, submitted: i64 },

    /// Monetary arithmetic overflowed i64.
    #[error("Amount is too large")]
    AmountOverflow,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// One field failed a check. Messages are shown to the client as-is.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Malformed id, email or phone number.
    #[error("{field} is not valid: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        Self::Required { field: field.into() }
    }

    pub fn not_allowed(field: impl Into<String>, allowed: &[&str]) -> Self {
        ValidationError::NotAllowed {
            field: field.into(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::TotalMismatch {
            computed: 1000,
            submitted: 900,
        };
        assert_eq!(
            err.to_string(),
            "Submitted total 900 does not match computed total 1000"
        );
        assert_eq!(
            CoreError::EmptySale.to_string(),
            "A sale must contain at least one item"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("email");
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        };
        assert_eq!(err.to_string(), "password must be at least 6 characters");

        let err = ValidationError::not_allowed("role", &["vendor", "admin"]);
        assert_eq!(err.to_string(), "role must be one of: [\"vendor\", \"admin\"]");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("name").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
