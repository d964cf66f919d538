//! JSON artifact formats for linear scalers and classifiers.
//!
//! These carry the fitted attributes of the scikit-learn estimators the churn
//! model is usually trained with (`StandardScaler`, `MinMaxScaler`,
//! `LogisticRegression`) so the form can run without an ONNX export.

use crate::models::{check_arity, Classifier, PipelineError, Scaler};
use serde::{Deserialize, Serialize};

/// Fitted feature scaler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinearScaler {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl LinearScaler {
    /// Number of features the scaler was fitted on.
    pub fn arity(&self) -> usize {
        match self {
            LinearScaler::Standard { mean, .. } => mean.len(),
            LinearScaler::MinMax { min, .. } => min.len(),
        }
    }

    /// Check the fitted attributes are consistent and match `expected` features.
    pub fn validate(&self, expected: usize) -> Result<(), String> {
        let (offset, scale) = match self {
            LinearScaler::Standard { mean, scale } => (mean, scale),
            LinearScaler::MinMax { min, scale } => (min, scale),
        };

        if offset.len() != scale.len() {
            return Err(format!(
                "offset has {} values but scale has {}",
                offset.len(),
                scale.len()
            ));
        }
        if offset.len() != expected {
            return Err(format!("fitted on {} features, expected {}", offset.len(), expected));
        }
        if offset.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err("contains non-finite values".to_string());
        }
        Ok(())
    }
}

/// Zero-variance columns are left unscaled, as scikit-learn does.
fn safe_scale(scale: f64) -> f64 {
    if scale == 0.0 {
        1.0
    } else {
        scale
    }
}

impl Scaler for LinearScaler {
    fn transform(&self, features: &[f32]) -> Result<Vec<f32>, PipelineError> {
        check_arity("scaler input", self.arity(), features.len())?;

        let scaled = match self {
            LinearScaler::Standard { mean, scale } => features
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(&x, (&m, &s))| ((x as f64 - m) / safe_scale(s)) as f32)
                .collect(),
            LinearScaler::MinMax { min, scale } => features
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(&x, (&m, &s))| (x as f64 * s + m) as f32)
                .collect(),
        };

        Ok(scaled)
    }

    fn describe(&self) -> String {
        match self {
            LinearScaler::Standard { .. } => "standard scaler (json)".to_string(),
            LinearScaler::MinMax { .. } => "min-max scaler (json)".to_string(),
        }
    }
}

fn default_classes() -> [i64; 2] {
    [0, 1]
}

/// Fitted linear classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinearClassifier {
    /// Predicts `classes[1]` when `w·x + b > 0`, otherwise `classes[0]`.
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_classes")]
        classes: [i64; 2],
    },
}

impl LinearClassifier {
    pub fn arity(&self) -> usize {
        match self {
            LinearClassifier::LogisticRegression { coefficients, .. } => coefficients.len(),
        }
    }

    pub fn validate(&self, expected: usize) -> Result<(), String> {
        let LinearClassifier::LogisticRegression {
            coefficients,
            intercept,
            ..
        } = self;

        if coefficients.len() != expected {
            return Err(format!(
                "fitted on {} features, expected {}",
                coefficients.len(),
                expected
            ));
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err("contains non-finite values".to_string());
        }
        Ok(())
    }

    /// Raw decision value `w·x + b`.
    pub fn decision_function(&self, features: &[f32]) -> Result<f64, PipelineError> {
        check_arity("classifier input", self.arity(), features.len())?;

        let LinearClassifier::LogisticRegression {
            coefficients,
            intercept,
            ..
        } = self;

        Ok(features
            .iter()
            .zip(coefficients)
            .map(|(&x, &w)| x as f64 * w)
            .sum::<f64>()
            + intercept)
    }
}

impl Classifier for LinearClassifier {
    fn predict(&self, features: &[f32]) -> Result<i64, PipelineError> {
        let decision = self.decision_function(features)?;
        let LinearClassifier::LogisticRegression { classes, .. } = self;

        Ok(if decision > 0.0 { classes[1] } else { classes[0] })
    }

    fn describe(&self) -> String {
        "logistic regression (json)".to_string()
    }
}
