//! Common test utilities and helpers
//!
//! - Database fixtures on temporary SQLite files
//! - Scripted moderation gates
//! - A seeded feed (owner, post, service) for comment scenarios
//! - Custom assertion macros

#![allow(dead_code)]

pub mod assertions;
pub mod database;
pub mod feed;
pub mod gate;

pub use database::*;
pub use feed::*;
pub use gate::*;
