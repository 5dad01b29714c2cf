//! Authentication Module
//!
//! Session tokens for the HTTP boundary. The comment core never sees tokens;
//! it receives the `Actor` recovered from one by the auth middleware.

/// JWT token generation and validation
pub mod sessions;

pub use sessions::{Claims, SessionKeys};
