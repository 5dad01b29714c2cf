/**
 * Server Initialization
 *
 * Builds the Axum application from configuration:
 *
 * 1. Open the feed database
 * 2. Build the moderation gate
 * 3. Create the comment service and session keys
 * 4. Create the router
 */

use std::sync::Arc;

use axum::Router;
use thiserror::Error;

use crate::backend::auth::SessionKeys;
use crate::backend::comments::CommentService;
use crate::backend::moderation::{ModerationError, ModerationGate, ModerationPolicy};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, load_moderation_gate};
use crate::backend::server::state::AppState;
use crate::shared::{AppConfig, ConfigError};

/// Failures that stop the server from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Moderation gate error: {0}")]
    Moderation(#[from] ModerationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Create and configure the Axum application
pub async fn create_app(config: &AppConfig) -> Result<Router<()>, StartupError> {
    let gate = load_moderation_gate(config)?;
    create_app_with_gate(config, gate).await
}

/// Create the application around an already-built moderation gate
pub async fn create_app_with_gate(
    config: &AppConfig,
    gate: Arc<dyn ModerationGate>,
) -> Result<Router<()>, StartupError> {
    tracing::info!("Initializing socialfeed backend server");

    let db = load_database(config).await?;
    let comments = CommentService::new(
        db,
        gate,
        ModerationPolicy::new(config.moderation_threshold),
        config.event_channel_capacity,
    );
    let app_state = AppState::new(comments, SessionKeys::new(&config.jwt_secret));

    let app = create_router(app_state);
    tracing::info!("Router configured");

    Ok(app)
}
