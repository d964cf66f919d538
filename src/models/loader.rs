//! Artifact loader: turns the configured scaler/model paths into trait objects

use crate::feature_extractor::FEATURE_COUNT;
use crate::models::linear::{LinearClassifier, LinearScaler};
use crate::models::{ArtifactKind, Classifier, PipelineError, Scaler};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// On-disk encoding of an artifact, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Json,
    Onnx,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(ArtifactFormat::Json),
            "onnx" => Some(ArtifactFormat::Onnx),
            _ => None,
        }
    }
}

/// Loader for scaler and classifier artifacts
pub struct ArtifactLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ArtifactLoader {
    /// Create a new loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new loader with the given ONNX intra-op thread count
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the fitted scaler
    pub fn load_scaler<P: AsRef<Path>>(&self, path: P) -> Result<Box<dyn Scaler>, PipelineError> {
        let path = path.as_ref();
        let format = self.inspect(path, ArtifactKind::Scaler)?;

        let scaler: Box<dyn Scaler> = match format {
            ArtifactFormat::Json => {
                let scaler: LinearScaler = read_json(path, ArtifactKind::Scaler)?;
                scaler
                    .validate(FEATURE_COUNT)
                    .map_err(|detail| PipelineError::missing(ArtifactKind::Scaler, path, detail))?;
                Box::new(scaler)
            }
            ArtifactFormat::Onnx => self.load_onnx_scaler(path)?,
        };

        info!(path = %path.display(), scaler = %scaler.describe(), "Scaler loaded");
        Ok(scaler)
    }

    /// Load the fitted classifier
    pub fn load_classifier<P: AsRef<Path>>(&self, path: P) -> Result<Box<dyn Classifier>, PipelineError> {
        let path = path.as_ref();
        let format = self.inspect(path, ArtifactKind::Model)?;

        let classifier: Box<dyn Classifier> = match format {
            ArtifactFormat::Json => {
                let model: LinearClassifier = read_json(path, ArtifactKind::Model)?;
                model
                    .validate(FEATURE_COUNT)
                    .map_err(|detail| PipelineError::missing(ArtifactKind::Model, path, detail))?;
                Box::new(model)
            }
            ArtifactFormat::Onnx => self.load_onnx_classifier(path)?,
        };

        info!(path = %path.display(), model = %classifier.describe(), "Model loaded");
        Ok(classifier)
    }

    /// Check the file exists and has a known format.
    fn inspect(&self, path: &Path, artifact: ArtifactKind) -> Result<ArtifactFormat, PipelineError> {
        if !path.is_file() {
            warn!(%artifact, path = %path.display(), "Artifact file not found");
            return Err(PipelineError::missing(artifact, path, "file not found"));
        }

        ArtifactFormat::from_path(path).ok_or_else(|| {
            PipelineError::missing(artifact, path, "unsupported format, expected .json or .onnx")
        })
    }

    #[cfg(feature = "onnx")]
    fn load_onnx_scaler(&self, path: &Path) -> Result<Box<dyn Scaler>, PipelineError> {
        let scaler = crate::models::onnx::OnnxScaler::load(path, self.onnx_threads, FEATURE_COUNT)?;
        Ok(Box::new(scaler))
    }

    #[cfg(not(feature = "onnx"))]
    fn load_onnx_scaler(&self, path: &Path) -> Result<Box<dyn Scaler>, PipelineError> {
        Err(PipelineError::missing(
            ArtifactKind::Scaler,
            path,
            "built without ONNX support",
        ))
    }

    #[cfg(feature = "onnx")]
    fn load_onnx_classifier(&self, path: &Path) -> Result<Box<dyn Classifier>, PipelineError> {
        let model = crate::models::onnx::OnnxClassifier::load(path, self.onnx_threads, FEATURE_COUNT)?;
        Ok(Box::new(model))
    }

    #[cfg(not(feature = "onnx"))]
    fn load_onnx_classifier(&self, path: &Path) -> Result<Box<dyn Classifier>, PipelineError> {
        Err(PipelineError::missing(
            ArtifactKind::Model,
            path,
            "built without ONNX support",
        ))
    }
}

impl Default for ArtifactLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, artifact: ArtifactKind) -> Result<T, PipelineError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| PipelineError::missing(artifact, path, format!("cannot read: {e}")))?;

    serde_json::from_str(&raw)
        .map_err(|e| PipelineError::missing(artifact, path, format!("cannot decode: {e}")))
}
