//! Configuration management for the churn predictor

use crate::types::request::{Gender, PredictionRequest};
use crate::types::verdict::Verdict;
use anyhow::{bail, Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::fmt::Display;
use std::path::Path;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub artifacts: ArtifactsConfig,
    pub form: FormConfig,
    pub logging: LoggingConfig,
}

/// Locations of the externally produced scaler and model
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Fitted scaler (.json or .onnx)
    pub scaler_path: String,
    /// Fitted classifier (.json or .onnx)
    pub model_path: String,
    /// Number of threads for ONNX inference (default: 1)
    pub onnx_threads: usize,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            scaler_path: "artifacts/scaler.json".to_string(),
            model_path: "artifacts/model.json".to_string(),
            onnx_threads: 1,
        }
    }
}

/// Inclusive range an input control is limited to
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }
}

/// Limits for the numeric controls
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormBounds {
    pub age: Bounds<u32>,
    pub tenure: Bounds<u32>,
    pub monthly_charge: Bounds<f64>,
}

impl Default for FormBounds {
    fn default() -> Self {
        Self {
            age: Bounds::new(10, 100),
            tenure: Bounds::new(0, 130),
            monthly_charge: Bounds::new(30.0, 150.0),
        }
    }
}

impl FormBounds {
    /// Whether every numeric field of `request` lies within its bounds
    pub fn contains(&self, request: &PredictionRequest) -> bool {
        self.age.contains(request.age)
            && self.tenure.contains(request.tenure)
            && self.monthly_charge.contains(request.monthly_charge)
    }
}

/// Messages shown in the output region
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormLabels {
    pub churn: String,
    pub no_churn: String,
    pub idle_prompt: String,
}

impl Default for FormLabels {
    fn default() -> Self {
        Self {
            churn: Verdict::Churn.default_message().to_string(),
            no_churn: Verdict::NoChurn.default_message().to_string(),
            idle_prompt: "Please enter the values and use the predict button to see the churn prediction."
                .to_string(),
        }
    }
}

impl FormLabels {
    pub fn message(&self, verdict: Verdict) -> &str {
        match verdict {
            Verdict::Churn => &self.churn,
            Verdict::NoChurn => &self.no_churn,
        }
    }
}

/// Presentation of the input form
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub title: String,
    pub bounds: FormBounds,
    /// Initial value of every control
    pub defaults: FormDefaults,
    pub labels: FormLabels,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            title: "Churn Prediction App".to_string(),
            bounds: FormBounds::default(),
            defaults: FormDefaults::default(),
            labels: FormLabels::default(),
        }
    }
}

/// Initial control values; any field left out keeps its default
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormDefaults {
    pub age: u32,
    pub gender: Gender,
    pub tenure: u32,
    pub monthly_charge: f64,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            age: 30,
            gender: Gender::Male,
            tenure: 10,
            monthly_charge: 50.0,
        }
    }
}

impl FormDefaults {
    pub fn request(&self) -> PredictionRequest {
        PredictionRequest::new(self.age, self.gender, self.tenure, self.monthly_charge)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
    /// Log file; the terminal itself is owned by the form
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: "churn-predictor.log".to_string(),
        }
    }
}

fn check_bounds<T: PartialOrd + Copy + Display>(name: &str, bounds: &Bounds<T>, default: T) -> Result<()> {
    if bounds.min > bounds.max {
        bail!("form.bounds.{name}: min {} is above max {}", bounds.min, bounds.max);
    }
    if !bounds.contains(default) {
        bail!(
            "form.defaults.{name}: {} is outside [{}, {}]",
            default,
            bounds.min,
            bounds.max
        );
    }
    Ok(())
}

impl AppConfig {
    /// Load configuration from the default path, falling back to built-in
    /// defaults when the file does not exist
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .build()
            .context("Failed to build configuration")?;

        let config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject bounds the form could not honour
    pub fn validate(&self) -> Result<()> {
        let form = &self.form;
        check_bounds("age", &form.bounds.age, form.defaults.age)?;
        check_bounds("tenure", &form.bounds.tenure, form.defaults.tenure)?;
        check_bounds(
            "monthly_charge",
            &form.bounds.monthly_charge,
            form.defaults.monthly_charge,
        )?;

        if !form.bounds.monthly_charge.min.is_finite() || !form.bounds.monthly_charge.max.is_finite() {
            bail!("form.bounds.monthly_charge must be finite");
        }
        if self.artifacts.onnx_threads == 0 {
            bail!("artifacts.onnx_threads must be at least 1");
        }
        Ok(())
    }
}
