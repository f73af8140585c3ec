//! Error types for the customer core.
//!
//! This module defines custom error types using `thiserror` for precise error handling.

use crate::domain::{IdentityField, ValidationError};
use thiserror::Error;

/// Errors raised by customer operations and the collaborators they call.
#[derive(Error, Debug)]
pub enum CustomerError {
    /// An identity value is already held by another customer
    #[error("Duplicated {0}")]
    DuplicateField(IdentityField),

    /// Customer (or other record) not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request arguments
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A custom field value could not be coerced to its declared type
    #[error("Invalid value for field {field}: {reason}")]
    InvalidField { field: String, reason: String },

    /// A collaborator store or service failed
    #[error("{collaborator} failed: {message}")]
    Collaborator {
        collaborator: String,
        message: String,
    },

    /// The underlying customer store failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Failed to (de)serialize a JSON payload
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ValidationError> for CustomerError {
    fn from(err: ValidationError) -> Self {
        CustomerError::InvalidRequest(err.to_string())
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Other(String),
}

/// Convenience type alias for Results with CustomerError
pub type CustomerResult<T> = Result<T, CustomerError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
