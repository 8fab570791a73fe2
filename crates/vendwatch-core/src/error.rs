use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the vendwatch domain crate
#[derive(Error, Debug)]
pub enum DomainError {
    /// Field-level validation failures on write payloads
    #[error("Validation failed: {field} - {message}")]
    ValidationError { field: String, message: String },

    /// Amount validation errors
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    /// Date ordering violations on write payloads
    #[error("Invalid date range: start {start} is after expiry {expiry}")]
    InvalidDateRange { start: NaiveDate, expiry: NaiveDate },

    /// Unparseable token from user input
    #[error("Unknown {kind}: {token}")]
    UnknownToken { kind: String, token: String },
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Create a validation error
    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid amount error
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount {
            message: message.into(),
        }
    }

    /// Create an unknown token error
    pub fn unknown_token(kind: impl Into<String>, token: impl Into<String>) -> Self {
        Self::UnknownToken {
            kind: kind.into(),
            token: token.into(),
        }
    }

    /// Get error code for external systems
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::ValidationError { .. } => "VALIDATION_ERROR",
            DomainError::InvalidAmount { .. } => "INVALID_AMOUNT",
            DomainError::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            DomainError::UnknownToken { .. } => "UNKNOWN_TOKEN",
        }
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(err: validator::ValidationErrors) -> Self {
        let field = err
            .field_errors()
            .keys()
            .next()
            .map(|k| k.to_string())
            .unwrap_or_else(|| "multiple".to_string());
        Self::ValidationError {
            field,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let error = DomainError::validation_error("email", "not an email");
        assert_eq!(error.code(), "VALIDATION_ERROR");

        let error = DomainError::invalid_amount("negative");
        assert_eq!(error.code(), "INVALID_AMOUNT");
    }

    #[test]
    fn test_error_display() {
        let error = DomainError::unknown_token("status filter", "bogus");
        assert_eq!(error.to_string(), "Unknown status filter: bogus");
    }
}
