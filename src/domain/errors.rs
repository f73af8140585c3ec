//! Domain validation errors.

use thiserror::Error;

/// Rejections raised while constructing domain value objects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ID cannot be empty")]
    EmptyId,

    /// An operation that needs at least one id received none.
    #[error("At least one customer ID is required")]
    EmptyIdList,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),
}
