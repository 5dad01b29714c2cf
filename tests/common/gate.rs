//! Scripted moderation gates

use async_trait::async_trait;
use socialfeed::backend::moderation::{ModerationError, ModerationGate, ToxicityAssessment};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// What the gate answers
#[derive(Debug, Clone, PartialEq)]
pub enum GateMode {
    Accept,
    Score { score: f64, label: &'static str },
    Fail,
}

/// Gate whose answer the test controls, counting calls
#[derive(Debug)]
pub struct ScriptedGate {
    mode: Mutex<GateMode>,
    assessed: AtomicUsize,
    retrains: AtomicUsize,
}

impl ScriptedGate {
    pub fn new(mode: GateMode) -> Self {
        Self {
            mode: Mutex::new(mode),
            assessed: AtomicUsize::new(0),
            retrains: AtomicUsize::new(0),
        }
    }

    pub fn accepting() -> Self {
        Self::new(GateMode::Accept)
    }

    pub fn set_mode(&self, mode: GateMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn assessed(&self) -> usize {
        self.assessed.load(Ordering::SeqCst)
    }

    pub fn retrains(&self) -> usize {
        self.retrains.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModerationGate for ScriptedGate {
    async fn assess(&self, _text: &str) -> Result<ToxicityAssessment, ModerationError> {
        self.assessed.fetch_add(1, Ordering::SeqCst);
        let mode = self.mode.lock().unwrap().clone();
        match mode {
            GateMode::Accept => Ok(ToxicityAssessment::clean()),
            GateMode::Score { score, label } => Ok(ToxicityAssessment {
                toxic_score: score,
                label: Some(label.to_string()),
                topic: Some("general".to_string()),
            }),
            GateMode::Fail => Err(ModerationError::Unavailable("scripted failure".to_string())),
        }
    }

    async fn request_retrain(&self) -> Result<(), ModerationError> {
        self.retrains.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
