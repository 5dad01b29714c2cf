//! Backend Error Module
//!
//! Error types raised by the comment core and the HTTP layer.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{BackendError, Entity};

/// Result alias used across the backend
pub type Result<T> = std::result::Result<T, BackendError>;
