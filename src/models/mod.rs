//! Scaler and classifier artifacts and the inference pipeline built on them

pub mod error;
pub mod inference;
pub mod linear;
pub mod loader;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use error::{ArtifactKind, PipelineError};
pub use inference::ChurnPredictor;
pub use linear::{LinearClassifier, LinearScaler};
pub use loader::ArtifactLoader;

/// A fitted feature transform: ordered vector in, ordered vector of the same
/// arity out.
pub trait Scaler: Send + Sync {
    fn transform(&self, features: &[f32]) -> Result<Vec<f32>, PipelineError>;

    /// Short description used in logs and the form header
    fn describe(&self) -> String;
}

/// A fitted binary classifier returning the raw class label.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f32]) -> Result<i64, PipelineError>;

    /// Short description used in logs and the form header
    fn describe(&self) -> String;
}

/// Reject input whose length differs from what the artifact was fitted on.
pub(crate) fn check_arity(stage: &'static str, expected: usize, actual: usize) -> Result<(), PipelineError> {
    if expected != actual {
        return Err(PipelineError::ArityMismatch {
            stage,
            expected,
            actual,
        });
    }
    Ok(())
}
