//! ONNX Runtime backed artifacts (skl2onnx exports of the scaler and model)

use crate::models::{check_arity, ArtifactKind, Classifier, PipelineError, Scaler};
use anyhow::Result;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::tensor::TensorElementType;
use ort::value::{Tensor, ValueType};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Name, element type and dimensions of one graph input or output.
/// Dimensions are `-1` where the graph leaves them dynamic.
#[derive(Debug, Clone, PartialEq)]
struct TensorMeta {
    name: String,
    element: Option<TensorElementType>,
    dims: Vec<i64>,
}

impl TensorMeta {
    fn from_value_type(name: &str, value_type: &ValueType) -> Self {
        match value_type {
            ValueType::Tensor { ty, shape, .. } => Self {
                name: name.to_string(),
                element: Some(*ty),
                dims: shape.iter().copied().collect(),
            },
            // sequences and maps (zipmap probabilities) carry no usable shape
            _ => Self {
                name: name.to_string(),
                element: None,
                dims: Vec::new(),
            },
        }
    }

    fn is(&self, element: TensorElementType) -> bool {
        self.element == Some(element)
    }

    /// Fails when the last dimension is fixed to something other than `arity`.
    fn check_features(&self, role: &str, arity: usize) -> Result<(), String> {
        match self.dims.last() {
            None => Err(format!("{role} `{}` is not a [batch, features] tensor", self.name)),
            Some(&d) if d >= 0 && d as usize != arity => Err(format!(
                "{role} `{}` has {d} features, expected {arity}",
                self.name
            )),
            Some(_) => Ok(()),
        }
    }
}

/// The graph input the feature vector is fed through.
fn select_input(inputs: &[TensorMeta], arity: usize) -> Result<&TensorMeta, String> {
    let input = inputs.first().ok_or("ONNX graph has no inputs")?;
    if !input.is(TensorElementType::Float32) {
        return Err(format!("input `{}` is not a float tensor", input.name));
    }
    input.check_features("input", arity)?;
    Ok(input)
}

/// First float tensor output; its width must match the feature count.
fn select_scaled_output(outputs: &[TensorMeta], arity: usize) -> Result<&TensorMeta, String> {
    let output = outputs
        .iter()
        .find(|o| o.is(TensorElementType::Float32))
        .ok_or("ONNX graph has no float tensor output")?;
    output.check_features("output", arity)?;
    Ok(output)
}

/// The int64 label output, preferring one named `label`.
fn select_label_output(outputs: &[TensorMeta]) -> Result<&TensorMeta, String> {
    let mut labels = outputs.iter().filter(|o| o.is(TensorElementType::Int64));
    let first = labels.clone().next();
    labels
        .find(|o| o.name.contains("label"))
        .or(first)
        .ok_or_else(|| "ONNX graph has no int64 label output".to_string())
}

/// Loaded ONNX session with the tensor names it is driven through
struct OnnxSession {
    /// Session needs `&mut` to run
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    arity: usize,
}

fn open_session(path: &Path, threads: usize) -> Result<Session> {
    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(threads)?
        .commit_from_file(path)?;
    Ok(session)
}

fn inference_error(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::Inference(e.to_string())
}

impl OnnxSession {
    fn load(
        path: &Path,
        artifact: ArtifactKind,
        threads: usize,
        arity: usize,
        select_output: impl Fn(&[TensorMeta], usize) -> Result<&TensorMeta, String>,
    ) -> Result<Self, PipelineError> {
        info!(%artifact, path = %path.display(), threads, "Loading ONNX artifact");

        let session = open_session(path, threads)
            .map_err(|e| PipelineError::missing(artifact, path, format!("cannot open ONNX session: {e}")))?;

        let inputs: Vec<TensorMeta> = session
            .inputs
            .iter()
            .map(|i| TensorMeta::from_value_type(&i.name, &i.input_type))
            .collect();
        let outputs: Vec<TensorMeta> = session
            .outputs
            .iter()
            .map(|o| TensorMeta::from_value_type(&o.name, &o.output_type))
            .collect();

        let input_name = select_input(&inputs, arity)
            .map_err(|detail| PipelineError::missing(artifact, path, detail))?
            .name
            .clone();
        let output_name = select_output(&outputs, arity)
            .map_err(|detail| PipelineError::missing(artifact, path, detail))?
            .name
            .clone();

        info!(
            %artifact,
            input = %input_name,
            output = %output_name,
            "ONNX artifact loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            arity,
        })
    }

    /// Run one sample of shape `[1, n]` and hand the named output to `extract`.
    fn run<T>(
        &self,
        stage: &'static str,
        features: &[f32],
        extract: impl FnOnce(&ort::value::DynValue) -> Result<T, PipelineError>,
    ) -> Result<T, PipelineError> {
        check_arity(stage, self.arity, features.len())?;

        let shape = vec![1_i64, features.len() as i64];
        let input = Tensor::from_array((shape, features.to_vec())).map_err(inference_error)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| PipelineError::Inference(format!("Lock error: {e}")))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(inference_error)?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| PipelineError::Inference(format!("missing output {}", self.output_name)))?;

        extract(output)
    }
}

/// Scaler exported to ONNX; the first float output is the scaled vector.
pub struct OnnxScaler {
    inner: OnnxSession,
}

impl OnnxScaler {
    pub fn load(path: &Path, threads: usize, arity: usize) -> Result<Self, PipelineError> {
        let inner = OnnxSession::load(path, ArtifactKind::Scaler, threads, arity, select_scaled_output)?;
        Ok(Self { inner })
    }
}

impl Scaler for OnnxScaler {
    fn transform(&self, features: &[f32]) -> Result<Vec<f32>, PipelineError> {
        self.inner.run("scaler input", features, |output| {
            let (_, data) = output.try_extract_tensor::<f32>().map_err(inference_error)?;
            Ok(data.to_vec())
        })
    }

    fn describe(&self) -> String {
        "scaler (onnx)".to_string()
    }
}

/// Classifier exported to ONNX; reads the int64 `label` output.
pub struct OnnxClassifier {
    inner: OnnxSession,
}

impl OnnxClassifier {
    pub fn load(path: &Path, threads: usize, arity: usize) -> Result<Self, PipelineError> {
        let inner = OnnxSession::load(path, ArtifactKind::Model, threads, arity, |outputs, _| {
            select_label_output(outputs)
        })?;
        Ok(Self { inner })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &[f32]) -> Result<i64, PipelineError> {
        self.inner.run("classifier input", features, |output| {
            let (_, data) = output.try_extract_tensor::<i64>().map_err(inference_error)?;
            data.first()
                .copied()
                .ok_or_else(|| PipelineError::Inference("empty label tensor".to_string()))
        })
    }

    fn describe(&self) -> String {
        "classifier (onnx)".to_string()
    }
}
