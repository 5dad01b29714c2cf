//! Threaded Comments
//!
//! The comment core: a forest of comments per post with cascade delete and
//! counters that always match live data.
//!
//! # Module Structure
//!
//! ```text
//! comments/
//! ├── mod.rs         - Module exports
//! ├── service.rs     - create / update / delete / get / list
//! ├── transaction.rs - Transaction Coordinator
//! ├── counters.rs    - Counter Maintainer
//! ├── resolver.rs    - Descendant Resolver
//! └── tree.rs        - Tree Assembler
//! ```

pub mod counters;
pub mod resolver;
pub mod service;
pub mod transaction;
pub mod tree;

pub use resolver::{resolve_live_subtree, Subtree};
pub use service::{CommentService, CreateOutcome, DeleteOutcome};
pub use transaction::TransactionCoordinator;
pub use tree::{assemble_forest, MAX_DISPLAY_DEPTH};
