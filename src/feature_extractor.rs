//! Feature assembly for churn model inference.
//!
//! The scaler and classifier were fitted on columns in a fixed order; a
//! reordered vector still scores without any error, just wrongly. Everything
//! that builds model input goes through [`FeatureExtractor::extract`].

use crate::types::request::PredictionRequest;

/// Number of features the scaler and classifier expect.
pub const FEATURE_COUNT: usize = 4;

/// Column names in training order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["Age", "Gender", "Tenure", "MonthlyCharges"];

/// Model input vector, `[age, gender_encoded, tenure, monthly_charge]`.
pub type FeatureVector = [f32; FEATURE_COUNT];

/// Feature extractor that turns a form submission into model input.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract features from a request in training order.
    pub fn extract(&self, request: &PredictionRequest) -> FeatureVector {
        [
            request.age as f32,
            f32::from(request.gender.encode()),
            request.tenure as f32,
            request.monthly_charge as f32,
        ]
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names in training order.
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::request::Gender;

    #[test]
    fn test_feature_extraction() {
        let extractor = FeatureExtractor::new();
        let request = PredictionRequest::new(35, Gender::Female, 24, 75.0);

        let features = extractor.extract(&request);

        assert_eq!(features, [35.0, 1.0, 24.0, 75.0]);
    }

    #[test]
    fn test_gender_position() {
        let extractor = FeatureExtractor::new();
        let male = extractor.extract(&PredictionRequest::new(50, Gender::Male, 3, 99.5));

        assert_eq!(male[0], 50.0); // age
        assert_eq!(male[1], 0.0); // gender
        assert_eq!(male[2], 3.0); // tenure
        assert_eq!(male[3], 99.5); // monthly charge
    }

    #[test]
    fn test_order_holds_across_bounds() {
        let extractor = FeatureExtractor::new();
        for age in [10, 18, 55, 90, 100] {
            for tenure in [0, 1, 72, 130] {
                for charge in [10.0, 30.0, 87.25, 150.0, 200.0] {
                    for gender in [Gender::Male, Gender::Female] {
                        let request = PredictionRequest::new(age, gender, tenure, charge);
                        let features = extractor.extract(&request);
                        assert_eq!(features.len(), FEATURE_COUNT);
                        assert_eq!(features[0], age as f32);
                        assert_eq!(features[1], f32::from(gender.encode()));
                        assert_eq!(features[2], tenure as f32);
                        assert_eq!(features[3], charge as f32);
                    }
                }
            }
        }
    }

    #[test]
    fn test_feature_count() {
        let extractor = FeatureExtractor::new();
        assert_eq!(extractor.feature_count(), 4);
        assert_eq!(extractor.feature_names(), &["Age", "Gender", "Tenure", "MonthlyCharges"]);
    }
}
