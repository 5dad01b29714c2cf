//! Shared Module
//!
//! This module contains the types shared by the comment core and the HTTP
//! boundary: comment and post records, request bodies, post-commit event
//! payloads, configuration and validation errors.
//!
//! All types here are plain data. Nothing in this module touches the store.

/// Comment records and request bodies
pub mod comment;

/// Post records
pub mod post;

/// Post-commit event payloads
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use comment::{Actor, AuditStamp, Comment, CommentNode, NewComment, UpdateComment};
pub use post::{NewPost, Post};
pub use event::{ActionType, CommentNotification, NotificationKind};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
