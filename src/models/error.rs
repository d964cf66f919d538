//! Errors raised while loading artifacts or running inference

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which external artifact a failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Scaler,
    Model,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Scaler => f.write_str("scaler"),
            ArtifactKind::Model => f.write_str("model"),
        }
    }
}

/// Errors that can occur in the scaler/classifier pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An artifact file is absent, unreadable or cannot be decoded.
    #[error("{artifact} artifact not available at {}: {detail}", path.display())]
    ArtifactMissing {
        artifact: ArtifactKind,
        path: PathBuf,
        detail: String,
    },
    #[error("{stage} expected {expected} values, got {actual}")]
    ArityMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("classifier returned label {0}, expected 0 or 1")]
    UnexpectedLabel(i64),
    #[error("inference failed: {0}")]
    Inference(String),
}

impl PipelineError {
    pub fn missing(artifact: ArtifactKind, path: impl Into<PathBuf>, detail: impl fmt::Display) -> Self {
        PipelineError::ArtifactMissing {
            artifact,
            path: path.into(),
            detail: detail.to_string(),
        }
    }

    /// True for startup failures that must stop the form from serving.
    pub fn is_artifact_missing(&self) -> bool {
        matches!(self, PipelineError::ArtifactMissing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_message_names_artifact_and_path() {
        let err = PipelineError::missing(ArtifactKind::Scaler, "artifacts/scaler.json", "file not found");
        let msg = err.to_string();

        assert!(msg.contains("scaler"));
        assert!(msg.contains("artifacts/scaler.json"));
        assert!(msg.contains("file not found"));
        assert!(err.is_artifact_missing());
    }

    #[test]
    fn test_other_errors_are_not_startup_failures() {
        assert!(!PipelineError::UnexpectedLabel(7).is_artifact_missing());
        assert!(!PipelineError::Inference("boom".into()).is_artifact_missing());
    }
}
