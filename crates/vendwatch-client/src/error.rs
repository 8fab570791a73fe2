//! Error types for backend communication

use thiserror::Error;
use vendwatch_core::error::DomainError;

/// Errors raised while talking to the vendor management backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failures (connect, timeout, TLS)
    #[error("Network error: {message}")]
    NetworkError { message: String },

    /// Non-success response from the backend
    #[error("API error: HTTP {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Missing, rejected, or expired credentials
    #[error("Authentication error: {message}")]
    AuthenticationError { message: String },

    /// Response body could not be decoded
    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    /// Client was constructed or configured incorrectly
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// Token cache could not be read or written
    #[error("Token store error: {message}")]
    StoreError { message: String },

    /// Payload rejected locally before any request was sent
    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl ClientError {
    /// Create a network error
    pub fn network_error(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Create an API error from a response status and body
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn authentication_error(message: impl Into<String>) -> Self {
        Self::AuthenticationError {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration_error(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Create a token store error
    pub fn store_error(message: impl Into<String>) -> Self {
        Self::StoreError {
            message: message.into(),
        }
    }

    /// Check if the error is worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkError { .. } => true,
            Self::ApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Check if the error means the caller must log in again
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthenticationError { .. })
    }

    /// Check if the backend reported a missing resource
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Get error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            Self::NetworkError { .. } => "NETWORK_ERROR",
            Self::ApiError { .. } => "API_ERROR",
            Self::AuthenticationError { .. } => "AUTHENTICATION_ERROR",
            Self::SerializationError { .. } => "SERIALIZATION_ERROR",
            Self::ConfigurationError { .. } => "CONFIGURATION_ERROR",
            Self::StoreError { .. } => "STORE_ERROR",
            Self::ValidationError { .. } => "VALIDATION_ERROR",
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::NetworkError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for ClientError {
    fn from(err: DomainError) -> Self {
        Self::ValidationError {
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError {
            message: err.to_string(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
