/**
 * Server Configuration
 *
 * Turns `AppConfig` into the live services the server runs on: the feed
 * database and the moderation gate.
 */

use std::sync::Arc;

use crate::backend::moderation::{HttpModerationGate, ModerationError, ModerationGate};
use crate::backend::store::FeedDatabase;
use crate::shared::AppConfig;

/// Open the feed database named by the configuration
///
/// Creates the file and applies the schema when needed.
pub async fn load_database(config: &AppConfig) -> Result<FeedDatabase, sqlx::Error> {
    tracing::info!("Connecting to database...");

    match FeedDatabase::connect_url(&config.database_url, config.max_connections).await {
        Ok(db) => {
            let stats = db.get_stats().await?;
            tracing::info!(
                "Database ready: {} posts, {} live comments",
                stats.post_count,
                stats.live_comment_count
            );
            Ok(db)
        }
        Err(e) => {
            tracing::error!("Failed to open database {}: {:?}", config.database_url, e);
            Err(e)
        }
    }
}

/// Build the HTTP moderation gate from configuration
pub fn load_moderation_gate(config: &AppConfig) -> Result<Arc<dyn ModerationGate>, ModerationError> {
    let gate = HttpModerationGate::from_config(config)?;
    tracing::info!(
        "Moderation gate at {} (threshold {}, timeout {:?})",
        config.moderation_url,
        config.moderation_threshold,
        config.moderation_timeout
    );
    Ok(Arc::new(gate))
}
