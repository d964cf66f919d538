//! Sample Artifact Generator
//!
//! Writes a standard scaler fitted on a synthetic customer population and a
//! fixed logistic regression, so the churn form can run without the external
//! training toolchain.
//!
//! Usage: generate_artifacts [output_dir] [population]

use anyhow::{Context, Result};
use churn_predictor::config::{ArtifactsConfig, FormBounds};
use churn_predictor::feature_extractor::{FeatureExtractor, FEATURE_COUNT, FEATURE_NAMES};
use churn_predictor::models::{ChurnPredictor, LinearClassifier, LinearScaler};
use churn_predictor::types::request::{Gender, PredictionRequest};
use rand::Rng;
use std::fs;
use std::path::Path;
use tracing::info;

/// Coefficients on standardized features: long tenure keeps customers, high
/// charges push them out
const COEFFICIENTS: [f64; FEATURE_COUNT] = [-0.35, 0.05, -1.25, 0.9];
const INTERCEPT: f64 = -0.6;

/// Random customers inside the form bounds
struct CustomerGenerator {
    rng: rand::rngs::ThreadRng,
    bounds: FormBounds,
}

impl CustomerGenerator {
    fn new(bounds: FormBounds) -> Self {
        Self {
            rng: rand::thread_rng(),
            bounds,
        }
    }

    fn generate(&mut self) -> PredictionRequest {
        let gender = if self.rng.gen_bool(0.5) {
            Gender::Female
        } else {
            Gender::Male
        };

        PredictionRequest::new(
            self.rng.gen_range(self.bounds.age.min..=self.bounds.age.max),
            gender,
            self.rng.gen_range(self.bounds.tenure.min..=self.bounds.tenure.max),
            self.rng
                .gen_range(self.bounds.monthly_charge.min..=self.bounds.monthly_charge.max),
        )
    }
}

/// Column means and population standard deviations, as a standard scaler fits them.
fn fit_standard_scaler(rows: &[[f32; FEATURE_COUNT]]) -> LinearScaler {
    let n = rows.len().max(1) as f64;
    let mut mean = vec![0.0; FEATURE_COUNT];
    let mut scale = vec![0.0; FEATURE_COUNT];

    for row in rows {
        for (m, &x) in mean.iter_mut().zip(row) {
            *m += x as f64 / n;
        }
    }
    for row in rows {
        for ((s, &m), &x) in scale.iter_mut().zip(&mean).zip(row) {
            *s += (x as f64 - m).powi(2) / n;
        }
    }
    for s in scale.iter_mut() {
        *s = if *s > 0.0 { s.sqrt() } else { 1.0 };
    }

    LinearScaler::Standard { mean, scale }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("generate_artifacts=info".parse()?),
        )
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let out_dir = args.get(1).map(|s| s.as_str()).unwrap_or("artifacts");
    let population: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(5000);

    info!(out_dir = %out_dir, population, "Generating sample artifacts");

    let extractor = FeatureExtractor::new();
    let mut generator = CustomerGenerator::new(FormBounds::default());
    let rows: Vec<_> = (0..population)
        .map(|_| extractor.extract(&generator.generate()))
        .collect();

    let scaler = fit_standard_scaler(&rows);
    let model = LinearClassifier::LogisticRegression {
        coefficients: COEFFICIENTS.to_vec(),
        intercept: INTERCEPT,
        classes: [0, 1],
    };

    fs::create_dir_all(out_dir).with_context(|| format!("Failed to create {out_dir}"))?;
    let scaler_path = Path::new(out_dir).join("scaler.json");
    let model_path = Path::new(out_dir).join("model.json");
    write_json(&scaler_path, &scaler)?;
    write_json(&model_path, &model)?;

    if let LinearScaler::Standard { mean, scale } = &scaler {
        for ((name, m), s) in FEATURE_NAMES.iter().zip(mean).zip(scale) {
            info!(feature = %name, mean = format!("{m:.3}"), scale = format!("{s:.3}"), "Fitted column");
        }
    }

    // Read the files back the way the form does
    let predictor = ChurnPredictor::new(&ArtifactsConfig {
        scaler_path: scaler_path.display().to_string(),
        model_path: model_path.display().to_string(),
        onnx_threads: 1,
    })?;

    let mut churners = 0;
    for _ in 0..100 {
        let outcome = predictor.predict(&generator.generate())?;
        if outcome.verdict.label() == 1 {
            churners += 1;
        }
    }

    let sample = PredictionRequest::new(35, Gender::Female, 24, 75.0);
    let outcome = predictor.predict(&sample)?;
    info!(
        features = ?outcome.features,
        churn = outcome.verdict.answer(),
        "Sample prediction"
    );
    info!(
        "Completed! Wrote {} and {} ({} of 100 random customers churn)",
        scaler_path.display(),
        model_path.display(),
        churners
    );

    Ok(())
}
