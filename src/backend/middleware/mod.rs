//! Middleware Module
//!
//! HTTP middleware applied in front of the route handlers.
//!
//! - **`auth`** - bearer token verification and the `AuthUser` extractor

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
