//! Socialfeed - Threaded Comments Backend
//!
//! A social-feed backend centred on its threaded-comment subsystem: a
//! self-referencing forest of comments per post, where deletion cascades
//! through an arbitrarily deep subtree and the post and parent counters stay
//! exactly equal to the live data under concurrent writes. New comments pass
//! an external moderation gate first.
//!
//! # Module Structure
//!
//! - **`shared`** - Plain data shared by the core and the HTTP boundary
//!   - Comment and post records, request bodies
//!   - Post-commit event payloads
//!   - Configuration and validation errors
//!
//! - **`backend`** - The comment core and, with `ssr`, the Axum server
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - HTTP server, JWT authentication, server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use socialfeed::backend::comments::{CommentService, CreateOutcome};
//! use socialfeed::backend::moderation::{HttpModerationGate, ModerationPolicy};
//! use socialfeed::backend::store::FeedDatabase;
//! use socialfeed::shared::{Actor, NewComment};
//!
//! # async fn example(post_id: uuid::Uuid) -> Result<(), Box<dyn std::error::Error>> {
//! let db = FeedDatabase::connect_url("sqlite:feed.db", 4).await?;
//! let gate = HttpModerationGate::new("http://localhost:5000", std::time::Duration::from_secs(5))?;
//! let service = CommentService::new(db, Arc::new(gate), ModerationPolicy::default(), 256);
//!
//! let actor = Actor::new(uuid::Uuid::new_v4(), "me@example.com");
//! let request = NewComment { post_id, parent_id: None, content: "hello".into() };
//! if let CreateOutcome::Created(comment) = service.create(&actor, request).await? {
//!     service.delete(&actor, comment.id).await?;
//! }
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
