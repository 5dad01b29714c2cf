//! Route Configuration Module
//!
//! HTTP routes for the backend server, grouped by resource.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs            - Module exports and documentation
//! ├── router.rs         - Main router creation
//! ├── post_routes.rs    - Post creation and comment listing
//! └── comment_routes.rs - Comment create / get / edit / delete
//! ```

/// Main router creation
pub mod router;

/// Post endpoints
pub mod post_routes;

/// Comment endpoints
pub mod comment_routes;

pub use router::create_router;
