//! Type definitions for the churn predictor

pub mod request;
pub mod verdict;

pub use request::{Gender, PredictionRequest};
pub use verdict::{PredictionOutcome, Verdict};
