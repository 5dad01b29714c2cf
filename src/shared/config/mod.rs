//! Application configuration module
//!
//! Provides the configuration shared by the comment service and the HTTP server.
//! Values come from, in increasing priority: built-in defaults, an optional TOML
//! file named by `SOCIALFEED_CONFIG`, and environment variables.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default moderation service URL
const DEFAULT_MODERATION_URL: &str = "http://127.0.0.1:5000";

/// Score at or above which the moderation gate rejects a comment
pub const DEFAULT_MODERATION_THRESHOLD: f64 = 0.55;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_MODERATION_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1000;
const DEFAULT_MAX_CONNECTIONS: u32 = 8;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite database URL (`sqlite:/path/to/feed.db`)
    pub database_url: String,
    /// Maximum pooled database connections
    pub max_connections: u32,
    /// HTTP listen port
    pub server_port: u16,
    /// HMAC secret used to verify bearer tokens
    pub jwt_secret: String,
    /// Base URL of the moderation service
    pub moderation_url: String,
    /// Rejection threshold for the toxicity score
    pub moderation_threshold: f64,
    /// Request timeout for moderation calls
    pub moderation_timeout: Duration,
    /// Capacity of the post-commit notification channel
    pub event_channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            server_port: DEFAULT_SERVER_PORT,
            jwt_secret: "change-me-in-production".to_string(),
            moderation_url: DEFAULT_MODERATION_URL.to_string(),
            moderation_threshold: DEFAULT_MODERATION_THRESHOLD,
            moderation_timeout: DEFAULT_MODERATION_TIMEOUT,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from the optional TOML file and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = match std::env::var("SOCIALFEED_CONFIG") {
            Ok(path) => AppConfigBuilder::from_toml_file(path)?,
            Err(_) => AppConfigBuilder::default(),
        };

        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            builder = builder.server_port(parse_env("SERVER_PORT", &port)?);
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            builder = builder.jwt_secret(secret);
        }
        if let Ok(url) = std::env::var("MODERATION_URL") {
            builder = builder.moderation_url(url);
        }
        if let Ok(threshold) = std::env::var("MODERATION_THRESHOLD") {
            builder = builder.moderation_threshold(parse_env("MODERATION_THRESHOLD", &threshold)?);
        }
        if let Ok(ms) = std::env::var("MODERATION_TIMEOUT_MS") {
            let ms: u64 = parse_env("MODERATION_TIMEOUT_MS", &ms)?;
            builder = builder.moderation_timeout(Duration::from_millis(ms));
        }
        if let Ok(capacity) = std::env::var("EVENT_CHANNEL_CAPACITY") {
            builder = builder.event_channel_capacity(parse_env("EVENT_CHANNEL_CAPACITY", &capacity)?);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.database_url.starts_with("sqlite:") {
            return Err(ConfigError::InvalidUrl(self.database_url.clone()));
        }
        if !(self.moderation_url.starts_with("http://") || self.moderation_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.moderation_url.clone()));
        }
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("jwt_secret"));
        }
        if !(0.0..=1.0).contains(&self.moderation_threshold) {
            return Err(ConfigError::InvalidValue {
                key: "moderation_threshold",
                value: self.moderation_threshold.to_string(),
            });
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_connections",
                value: "0".to_string(),
            });
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "event_channel_capacity",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfigBuilder {
    database_url: Option<String>,
    max_connections: Option<u32>,
    server_port: Option<u16>,
    jwt_secret: Option<String>,
    moderation_url: Option<String>,
    moderation_threshold: Option<f64>,
    moderation_timeout_ms: Option<u64>,
    event_channel_capacity: Option<usize>,
}

impl AppConfigBuilder {
    /// Parse builder values from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read builder values from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    pub fn server_port(mut self, port: u16) -> Self {
        self.server_port = Some(port);
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn moderation_url(mut self, url: impl Into<String>) -> Self {
        self.moderation_url = Some(url.into());
        self
    }

    pub fn moderation_threshold(mut self, threshold: f64) -> Self {
        self.moderation_threshold = Some(threshold);
        self
    }

    pub fn moderation_timeout(mut self, timeout: Duration) -> Self {
        self.moderation_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = Some(capacity);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            database_url: self.database_url.unwrap_or(defaults.database_url),
            max_connections: self.max_connections.unwrap_or(defaults.max_connections),
            server_port: self.server_port.unwrap_or(defaults.server_port),
            jwt_secret: self.jwt_secret.unwrap_or(defaults.jwt_secret),
            moderation_url: self
                .moderation_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.moderation_url),
            moderation_threshold: self.moderation_threshold.unwrap_or(defaults.moderation_threshold),
            moderation_timeout: self
                .moderation_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.moderation_timeout),
            event_channel_capacity: self
                .event_channel_capacity
                .unwrap_or(defaults.event_channel_capacity),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },
    #[error("failed to parse config: {0}")]
    Parse(String),
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Default database location under the platform data directory
fn default_database_url() -> String {
    let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
    path.push("socialfeed");
    path.push("feed.db");
    format!("sqlite:{}", path.to_string_lossy())
}
