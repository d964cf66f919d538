//! Churn Predictor Library
//!
//! Scores customer churn from four attributes (age, gender, tenure, monthly
//! charge) with an externally fitted scaler and binary classifier, behind a
//! terminal form.

pub mod config;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod types;
pub mod ui;

pub use crate::config::AppConfig;
pub use feature_extractor::FeatureExtractor;
pub use models::inference::ChurnPredictor;
pub use models::PipelineError;
pub use types::{request::PredictionRequest, verdict::Verdict};
