//! End-to-end checks of artifact loading and prediction from files on disk

use churn_predictor::config::ArtifactsConfig;
use churn_predictor::models::{ArtifactKind, ChurnPredictor, PipelineError};
use churn_predictor::types::request::{Gender, PredictionRequest};
use churn_predictor::types::verdict::Verdict;
use std::path::Path;

const SCALER: &str = r#"{
    "kind": "standard",
    "mean": [45.0, 0.5, 32.0, 70.0],
    "scale": [15.0, 0.5, 24.0, 30.0]
}"#;

// churns on short tenure and high charges
const MODEL: &str = r#"{
    "kind": "logistic_regression",
    "coefficients": [0.0, 0.0, -1.5, 1.0],
    "intercept": 0.0
}"#;

fn write_artifacts(dir: &Path, scaler: &str, model: &str) -> ArtifactsConfig {
    let scaler_path = dir.join("scaler.json");
    let model_path = dir.join("model.json");
    std::fs::write(&scaler_path, scaler).expect("write scaler");
    std::fs::write(&model_path, model).expect("write model");

    ArtifactsConfig {
        scaler_path: scaler_path.display().to_string(),
        model_path: model_path.display().to_string(),
        onnx_threads: 1,
    }
}

#[test]
fn example_customer_is_scored_from_json_artifacts() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let config = write_artifacts(tmp.path(), SCALER, MODEL);
    let predictor = ChurnPredictor::new(&config).expect("load");

    let outcome = predictor
        .predict(&PredictionRequest::new(35, Gender::Female, 24, 75.0))
        .expect("predict");

    assert_eq!(outcome.features, [35.0, 1.0, 24.0, 75.0]);
    // (24-32)/24 = -1/3, (75-70)/30 = 1/6 → 0.5 + 0.1667 > 0
    assert!((outcome.scaled[2] + 1.0 / 3.0).abs() < 1e-6);
    assert!((outcome.scaled[3] - 1.0 / 6.0).abs() < 1e-6);
    assert_eq!(outcome.label, 1);
    assert_eq!(outcome.verdict, Verdict::Churn);
}

#[test]
fn loyal_customer_does_not_churn() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let config = write_artifacts(tmp.path(), SCALER, MODEL);
    let predictor = ChurnPredictor::new(&config).expect("load");

    let outcome = predictor
        .predict(&PredictionRequest::new(60, Gender::Male, 120, 40.0))
        .expect("predict");

    assert_eq!(outcome.verdict, Verdict::NoChurn);
}

#[test]
fn same_input_same_verdict_across_interactions() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let config = write_artifacts(tmp.path(), SCALER, MODEL);
    let predictor = ChurnPredictor::new(&config).expect("load");
    let request = PredictionRequest::new(28, Gender::Male, 6, 99.0);

    let verdicts: Vec<_> = (0..5)
        .map(|i| {
            // interleave other customers between identical submissions
            let _ = predictor.predict(&PredictionRequest::new(20 + i, Gender::Female, 100, 30.0));
            predictor.predict(&request).expect("predict").verdict
        })
        .collect();

    assert!(verdicts.iter().all(|v| *v == verdicts[0]));
}

#[test]
fn missing_scaler_yields_artifact_missing() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let mut config = write_artifacts(tmp.path(), SCALER, MODEL);
    config.scaler_path = tmp.path().join("absent.json").display().to_string();

    match ChurnPredictor::new(&config) {
        Err(PipelineError::ArtifactMissing { artifact, .. }) => assert_eq!(artifact, ArtifactKind::Scaler),
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("predictor built without a scaler"),
    }
}

#[test]
fn missing_model_yields_artifact_missing() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let mut config = write_artifacts(tmp.path(), SCALER, MODEL);
    std::fs::remove_file(&config.model_path).expect("remove model");
    config.onnx_threads = 2;

    match ChurnPredictor::new(&config) {
        Err(PipelineError::ArtifactMissing { artifact, .. }) => assert_eq!(artifact, ArtifactKind::Model),
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("predictor built without a model"),
    }
}

#[test]
fn corrupt_artifacts_are_treated_as_missing() {
    let tmp = tempfile::tempdir().expect("tmpdir");

    let config = write_artifacts(tmp.path(), "not json", MODEL);
    let err = ChurnPredictor::new(&config).err().expect("corrupt scaler");
    assert!(err.is_artifact_missing());
    assert!(err.to_string().contains("cannot decode"));

    // well-formed JSON fitted on the wrong number of features
    let three = r#"{"kind":"logistic_regression","coefficients":[1,2,3],"intercept":0}"#;
    let config = write_artifacts(tmp.path(), SCALER, three);
    let err = ChurnPredictor::new(&config).err().expect("wrong arity");
    assert!(err.is_artifact_missing());
}

#[test]
fn unsupported_format_is_rejected() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let mut config = write_artifacts(tmp.path(), SCALER, MODEL);
    let pickle = tmp.path().join("model.pkl");
    std::fs::write(&pickle, b"\x80\x04").expect("write pickle");
    config.model_path = pickle.display().to_string();

    let err = ChurnPredictor::new(&config).err().expect("pickle");
    assert!(err.to_string().contains("unsupported format"));
}

#[test]
fn unexpected_class_labels_fail_loudly() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let model = r#"{
        "kind": "logistic_regression",
        "coefficients": [0.0, 0.0, 0.0, 0.0],
        "intercept": 1.0,
        "classes": [0, 2]
    }"#;
    let config = write_artifacts(tmp.path(), SCALER, model);
    let predictor = ChurnPredictor::new(&config).expect("load");

    let err = predictor
        .predict(&PredictionRequest::new(35, Gender::Female, 24, 75.0))
        .unwrap_err();
    assert!(matches!(err, PipelineError::UnexpectedLabel(2)));
}
