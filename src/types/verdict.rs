//! Classifier verdicts and the outcome of a single prediction

use crate::feature_extractor::FeatureVector;
use crate::models::error::PipelineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary churn verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Churn,
    NoChurn,
}

impl Verdict {
    /// Map a raw classifier label to a verdict.
    ///
    /// Only 1 (churn) and 0 (no churn) are meaningful; anything else means the
    /// loaded model does not match this form and is reported as an error.
    pub fn from_label(label: i64) -> Result<Self, PipelineError> {
        match label {
            1 => Ok(Verdict::Churn),
            0 => Ok(Verdict::NoChurn),
            other => Err(PipelineError::UnexpectedLabel(other)),
        }
    }

    pub fn label(self) -> i64 {
        match self {
            Verdict::Churn => 1,
            Verdict::NoChurn => 0,
        }
    }

    /// Short answer shown as "Predicted Churn: Yes/No"
    pub fn answer(self) -> &'static str {
        match self {
            Verdict::Churn => "Yes",
            Verdict::NoChurn => "No",
        }
    }

    /// Default sentence for the verdict; the form may override it from config.
    pub fn default_message(self) -> &'static str {
        match self {
            Verdict::Churn => "The customer will churn",
            Verdict::NoChurn => "The customer will not churn",
        }
    }
}

/// Everything produced by one pass through the scaler and classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    /// Raw features in model order
    pub features: FeatureVector,
    /// Features after the scaler
    pub scaled: Vec<f32>,
    /// Label returned by the classifier
    pub label: i64,
    pub verdict: Verdict,
    pub predicted_at: DateTime<Utc>,
}
