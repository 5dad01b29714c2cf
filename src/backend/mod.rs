//! Backend Module
//!
//! Server-side code: the threaded-comment core and the HTTP boundary
//! around it.
//!
//! # Architecture
//!
//! Always compiled:
//!
//! - **`store`** - SQLite persistence (posts, comments, activity ledger)
//! - **`comments`** - comment service, transaction coordinator, counters,
//!   descendant resolver, tree assembler
//! - **`moderation`** - moderation gate interface, policy and HTTP client
//! - **`events`** - post-commit notification and ledger dispatch
//! - **`error`** - backend error types
//!
//! With the `ssr` feature (default):
//!
//! - **`auth`** - JWT session tokens
//! - **`middleware`** - bearer token verification
//! - **`server`** - application state and initialization
//! - **`routes`** - HTTP routes
//!
//! # Consistency
//!
//! Every comment write runs in one `BEGIN IMMEDIATE` SQLite transaction
//! together with its counter deltas. Side effects (notifications, ledger,
//! moderation retraining) run after commit on detached tasks and cannot
//! affect the committed data.

/// Backend error types
pub mod error;

/// SQLite persistence
pub mod store;

/// Threaded comment core
pub mod comments;

/// Content moderation gate
pub mod moderation;

/// Post-commit events
pub mod events;

/// Session tokens
#[cfg(feature = "ssr")]
pub mod auth;

/// Middleware for request processing
#[cfg(feature = "ssr")]
pub mod middleware;

/// Server setup and configuration
#[cfg(feature = "ssr")]
pub mod server;

/// Route configuration
#[cfg(feature = "ssr")]
pub mod routes;

pub use comments::{CommentService, CreateOutcome, DeleteOutcome};
pub use error::BackendError;
pub use store::FeedDatabase;
#[cfg(feature = "ssr")]
pub use server::create_app;
