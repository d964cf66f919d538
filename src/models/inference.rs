//! Churn inference: feature assembly, scaling, classification, label mapping

use crate::config::ArtifactsConfig;
use crate::feature_extractor::{FeatureExtractor, FEATURE_COUNT};
use crate::models::loader::ArtifactLoader;
use crate::models::{check_arity, Classifier, PipelineError, Scaler};
use crate::types::request::PredictionRequest;
use crate::types::verdict::{PredictionOutcome, Verdict};
use chrono::Utc;
use tracing::{debug, info};

/// The loaded scaler and classifier, built once at startup and only ever
/// borrowed afterwards.
pub struct ChurnPredictor {
    extractor: FeatureExtractor,
    scaler: Box<dyn Scaler>,
    classifier: Box<dyn Classifier>,
}

impl ChurnPredictor {
    /// Load both artifacts from configuration.
    ///
    /// Fails with [`PipelineError::ArtifactMissing`] if either one is absent,
    /// unreadable or malformed; no predictor exists in that case.
    pub fn new(config: &ArtifactsConfig) -> Result<Self, PipelineError> {
        let loader = ArtifactLoader::with_threads(config.onnx_threads);
        let scaler = loader.load_scaler(&config.scaler_path)?;
        let classifier = loader.load_classifier(&config.model_path)?;

        let predictor = Self::from_parts(scaler, classifier);
        info!(
            scaler = %predictor.scaler.describe(),
            model = %predictor.classifier.describe(),
            "Churn predictor initialized"
        );
        Ok(predictor)
    }

    /// Build a predictor from already constructed artifacts
    pub fn from_parts(scaler: Box<dyn Scaler>, classifier: Box<dyn Classifier>) -> Self {
        Self {
            extractor: FeatureExtractor::new(),
            scaler,
            classifier,
        }
    }

    pub fn scaler_description(&self) -> String {
        self.scaler.describe()
    }

    pub fn classifier_description(&self) -> String {
        self.classifier.describe()
    }

    /// Score a single request.
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionOutcome, PipelineError> {
        let features = self.extractor.extract(request);

        let scaled = self.scaler.transform(&features)?;
        check_arity("scaler output", FEATURE_COUNT, scaled.len())?;

        let label = self.classifier.predict(&scaled)?;
        let verdict = Verdict::from_label(label)?;

        debug!(
            features = ?features,
            scaled = ?scaled,
            label,
            verdict = ?verdict,
            "Prediction complete"
        );

        Ok(PredictionOutcome {
            features,
            scaled,
            label,
            verdict,
            predicted_at: Utc::now(),
        })
    }
}
