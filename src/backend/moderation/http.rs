//! HTTP Moderation Client
//!
//! Talks to the classifier service:
//!
//! - `POST {base}/moderation` with `{"text": ...}`, answered by
//!   `{"toxic_score": f64, "label": str, "topic": str}`
//! - `POST {base}/train` to request retraining

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{ModerationError, ModerationGate, ToxicityAssessment};
use crate::shared::AppConfig;

#[derive(Debug, Serialize)]
struct ModerationRequest<'a> {
    text: &'a str,
}

/// Moderation gate backed by the classifier HTTP service
#[derive(Debug, Clone)]
pub struct HttpModerationGate {
    base_url: String,
    client: Client,
}

impl HttpModerationGate {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ModerationError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ModerationError> {
        Self::new(config.moderation_url.clone(), config.moderation_timeout)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ModerationGate for HttpModerationGate {
    async fn assess(&self, text: &str) -> Result<ToxicityAssessment, ModerationError> {
        let response = self
            .client
            .post(self.url("/moderation"))
            .json(&ModerationRequest { text })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ModerationError::Status(response.status().as_u16()));
        }

        Ok(response.json::<ToxicityAssessment>().await?)
    }

    async fn request_retrain(&self) -> Result<(), ModerationError> {
        let response = self.client.post(self.url("/train")).send().await?;

        if !response.status().is_success() {
            return Err(ModerationError::Status(response.status().as_u16()));
        }

        tracing::info!("Moderation model retraining requested");
        Ok(())
    }
}
