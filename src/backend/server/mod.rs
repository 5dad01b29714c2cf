//! Server Module
//!
//! Server setup: application state, service construction from
//! configuration, and app creation.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports and documentation
//! ├── state.rs  - AppState and FromRef implementations
//! ├── config.rs - Database and moderation gate loading
//! └── init.rs   - App creation
//! ```

/// Application state management
pub mod state;

/// Service loading from configuration
pub mod config;

/// Server initialization
pub mod init;

pub use init::{create_app, create_app_with_gate, StartupError};
pub use state::AppState;
