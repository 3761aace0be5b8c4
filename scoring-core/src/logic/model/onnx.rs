//! ONNX Classifier - ONNX Runtime Integration
//!
//! Expects a scikit-learn style export: one float input `[1, 30]`, an int64
//! label output, and optionally a float probability output `[1, 2]`
//! (column 1 = fraud). Exports that wrap probabilities in a ZipMap fail the
//! tensor extraction and the scorer falls back to the label.

use ndarray::Array2;
use parking_lot::Mutex;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;

use crate::logic::features::{FeatureVector, FEATURE_COUNT};
use super::inference::{Capability, Classifier, InferenceError, ModelError};

pub struct OnnxClassifier {
    /// `Session::run` needs `&mut`, so runs are serialized here
    session: Mutex<Session>,
    label_output: String,
    probability_output: Option<String>,
}

impl OnnxClassifier {
    /// Build a session from model bytes and resolve its capability
    pub fn from_bytes(
        model_bytes: &[u8],
        label_output: &str,
        probability_output: &str,
    ) -> Result<Self, ModelError> {
        log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| ModelError::Onnx(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::Onnx(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| ModelError::Onnx(format!("Load from memory error: {}", e)))?;

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        log::debug!("ONNX outputs: {:?}", output_names);

        if !output_names.iter().any(|n| n == label_output) {
            return Err(ModelError::Invalid(format!(
                "label output '{}' not found (outputs: {:?})",
                label_output, output_names
            )));
        }

        let resolved = output_names
            .iter()
            .find(|n| n.as_str() == probability_output)
            .cloned();

        if resolved.is_none() {
            log::warn!(
                "Probability output '{}' not found, model is label-only",
                probability_output
            );
        }

        Ok(Self {
            session: Mutex::new(session),
            label_output: label_output.to_string(),
            probability_output: resolved,
        })
    }

    fn input_array(features: &FeatureVector) -> Result<Array2<f32>, InferenceError> {
        Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), features.to_f32().to_vec())
            .map_err(|e| InferenceError::Runtime(format!("Array error: {}", e)))
    }
}

impl Classifier for OnnxClassifier {
    fn capability(&self) -> Capability {
        if self.probability_output.is_some() {
            Capability::Probabilistic
        } else {
            Capability::LabelOnly
        }
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        let output_name = self
            .probability_output
            .as_deref()
            .ok_or(InferenceError::Unsupported)?;

        let input_tensor = Value::from_array(Self::input_array(features)?)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(output_name)
            .ok_or_else(|| InferenceError::Output(format!("missing output '{}'", output_name)))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Output(format!("Extract error: {}", e)))?;

        // [p(legit), p(fraud)] for the single row
        let fraud = data
            .get(1)
            .copied()
            .ok_or_else(|| InferenceError::Output(format!("expected 2 class columns, got {}", data.len())))?;

        Ok(f64::from(fraud))
    }

    fn predict_label(&self, features: &FeatureVector) -> Result<bool, InferenceError> {
        let input_tensor = Value::from_array(Self::input_array(features)?)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(self.label_output.as_str())
            .ok_or_else(|| InferenceError::Output(format!("missing output '{}'", self.label_output)))?;

        let (_, data) = output
            .try_extract_tensor::<i64>()
            .map_err(|e| InferenceError::Output(format!("Extract error: {}", e)))?;

        let label = data
            .first()
            .copied()
            .ok_or_else(|| InferenceError::Output("empty label output".to_string()))?;

        Ok(label == 1)
    }

    fn model_type(&self) -> &str {
        "onnx"
    }
}
