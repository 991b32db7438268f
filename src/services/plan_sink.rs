use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::engine::MatchOutcome;

#[derive(Debug, Error)]
pub enum PlanSinkError {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable copy of the latest assignment plan
///
/// Persistence is best-effort from the caller's point of view: a failed
/// write is logged and the response still goes out.
#[derive(Debug, Clone)]
pub struct PlanSink {
    path: PathBuf,
}

impl PlanSink {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the outcome as pretty-printed JSON, replacing any previous plan
    pub async fn persist(&self, outcome: &MatchOutcome) -> Result<(), PlanSinkError> {
        let json = serde_json::to_vec_pretty(outcome)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::info!("Assignment plan saved to {}", self.path.display());
        Ok(())
    }
}
