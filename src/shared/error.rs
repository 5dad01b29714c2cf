//! Shared Error Types
//!
//! This module defines error types for input that fails validation before it
//! reaches the store. They are raised by the shared request types and wrapped
//! by `BackendError` on the server side.
//!
//! # Error Categories
//!
//! - `ValidationError` - Data validation failures
//!
//! # Usage
//!
//! ```rust
//! use socialfeed::shared::error::SharedError;
//!
//! let error = SharedError::validation("content", "Comment content cannot be empty");
//! ```
use thiserror::Error;

/// Shared error types raised before any store access
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
