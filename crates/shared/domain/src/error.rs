//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use std::fmt;

use thiserror::Error;

/// A user attribute that must be distinct across all stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Username => write!(f, "Username"),
            UniqueField::Email => write!(f, "Email"),
        }
    }
}

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// No user with the given id where one was required
    #[error("User not found with id: {id}")]
    NotFound { id: i64 },

    /// Username or email collision
    #[error("{field} already exists: {value}")]
    Duplicate { field: UniqueField, value: String },

    /// Anything else, e.g. the store being unavailable
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(id: i64) -> Self {
        DomainError::NotFound { id }
    }

    /// Create a duplicate username error
    pub fn duplicate_username(value: impl Into<String>) -> Self {
        DomainError::Duplicate {
            field: UniqueField::Username,
            value: value.into(),
        }
    }

    /// Create a duplicate email error
    pub fn duplicate_email(value: impl Into<String>) -> Self {
        DomainError::Duplicate {
            field: UniqueField::Email,
            value: value.into(),
        }
    }

    /// Create an unexpected error
    pub fn unexpected(msg: impl Into<String>) -> Self {
        DomainError::Unexpected(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
