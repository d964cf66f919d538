//! Churn Predictor - Main Entry Point
//!
//! Loads the scaler and model artifacts, then serves the churn form in the
//! terminal. If either artifact is missing the form is replaced by an error
//! screen and the process exits with an error.

use anyhow::{Context, Result};
use churn_predictor::{
    config::{AppConfig, LoggingConfig},
    metrics::SessionMetrics,
    models::inference::ChurnPredictor,
    ui::{
        self,
        screens::{fatal::FatalState, form::FormState},
        Screen,
    },
};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::{error, info};

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&logging.file)
        .with_context(|| format!("Failed to open log file {}", logging.file))?;

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("churn_predictor={}", logging.level).parse()?);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false);

    match logging.format.as_str() {
        "json" => builder.json().init(),
        _ => builder.init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_logging(&config.logging)?;

    info!("Starting Churn Predictor");
    info!(
        age = ?config.form.bounds.age,
        tenure = ?config.form.bounds.tenure,
        monthly_charge = ?config.form.bounds.monthly_charge,
        "Form bounds"
    );

    let metrics = SessionMetrics::new();

    // Both artifacts must load before any input is accepted
    let predictor = match ChurnPredictor::new(&config.artifacts) {
        Ok(predictor) => predictor,
        Err(e) => {
            error!(error = %e, "Failed to load artifacts, refusing to serve predictions");
            let state = FatalState::new(config.form.title.as_str(), format!("Error: {e}"));
            let e = ui::refuse_service(state, e, ui::run);
            return Err(e).context("Failed to load artifacts");
        }
    };

    ui::run(Screen::Form(FormState::new(&config.form, &predictor, &metrics)))?;

    info!("Churn Predictor shutting down...");
    metrics.print_summary();

    Ok(())
}
