//! Moderation Gate
//!
//! Pre-write content check consumed by comment creation. The gate itself is
//! an external service reached through [`ModerationGate`]; this module only
//! turns its answer into a verdict.
//!
//! The policy is fail-closed: a gate error yields the same non-persisting
//! outcome as a toxic verdict, never a hard error.

pub mod http;

pub use http::HttpModerationGate;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::config::DEFAULT_MODERATION_THRESHOLD;

/// Label the gate uses for content it considers toxic
pub const TOXIC_LABEL: &str = "toxic";

/// Raw answer from the gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToxicityAssessment {
    #[serde(default)]
    pub toxic_score: f64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

impl ToxicityAssessment {
    pub fn clean() -> Self {
        Self {
            toxic_score: 0.0,
            label: Some("clean".to_string()),
            topic: None,
        }
    }
}

/// Gate failures
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Moderation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Moderation service returned status {0}")]
    Status(u16),

    #[error("Moderation service unavailable: {0}")]
    Unavailable(String),
}

/// External content classifier
#[async_trait]
pub trait ModerationGate: Send + Sync {
    /// Score `text`
    async fn assess(&self, text: &str) -> Result<ToxicityAssessment, ModerationError>;

    /// Ask the classifier to retrain on recent activity
    async fn request_retrain(&self) -> Result<(), ModerationError> {
        Ok(())
    }
}

/// Why a comment was refused
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    Toxic {
        toxic_score: f64,
        topic: Option<String>,
    },
    Unavailable,
}

/// Structured refusal returned by create; nothing was persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationRejection {
    pub reason: RejectionReason,
    pub message: String,
}

impl ModerationRejection {
    pub fn toxic(toxic_score: f64, topic: Option<String>) -> Self {
        Self {
            reason: RejectionReason::Toxic { toxic_score, topic },
            message: "Comment contains toxic language. Please revise it.".to_string(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            reason: RejectionReason::Unavailable,
            message: "Content moderation is unavailable right now. Please try again.".to_string(),
        }
    }

    pub fn toxic_score(&self) -> Option<f64> {
        match &self.reason {
            RejectionReason::Toxic { toxic_score, .. } => Some(*toxic_score),
            RejectionReason::Unavailable => None,
        }
    }

    pub fn topic(&self) -> Option<&str> {
        match &self.reason {
            RejectionReason::Toxic { topic, .. } => topic.as_deref(),
            RejectionReason::Unavailable => None,
        }
    }
}

/// Gate decision for one piece of content
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accept(ToxicityAssessment),
    Reject(ModerationRejection),
}

/// Acceptance rule applied to gate answers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModerationPolicy {
    pub threshold: f64,
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MODERATION_THRESHOLD,
        }
    }
}

impl ModerationPolicy {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Decide on a gate answer
    pub fn judge(&self, assessment: ToxicityAssessment) -> Verdict {
        let flagged = assessment.label.as_deref() == Some(TOXIC_LABEL);
        if flagged || assessment.toxic_score >= self.threshold {
            Verdict::Reject(ModerationRejection::toxic(assessment.toxic_score, assessment.topic))
        } else {
            Verdict::Accept(assessment)
        }
    }

    /// Ask `gate` about `text` and decide; gate failure rejects
    pub async fn screen(&self, gate: &dyn ModerationGate, text: &str) -> Verdict {
        match gate.assess(text).await {
            Ok(assessment) => {
                tracing::debug!(
                    "Moderation score {:.3} label {:?}",
                    assessment.toxic_score,
                    assessment.label
                );
                self.judge(assessment)
            }
            Err(err) => {
                tracing::warn!("Moderation gate failed, rejecting content: {}", err);
                Verdict::Reject(ModerationRejection::unavailable())
            }
        }
    }
}
