//! Inference - classifier capability interface and model loading
//!
//! The classifier is a black box loaded once at startup. It is resolved into
//! one of two capabilities at load time:
//! - `Probabilistic`: exposes the positive-class probability (and a label)
//! - `LabelOnly`: only a predicted label
//!
//! Artifact format is picked by extension: `.onnx` (ONNX Runtime) or
//! `.json` (linear model).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::logic::features::FeatureVector;
use super::linear::LinearClassifier;
use super::onnx::OnnxClassifier;

// ============================================================================
// CAPABILITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Probabilistic,
    LabelOnly,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Per-call classifier failure. Always recoverable by the scorer.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("probability output not supported by this model")]
    Unsupported,

    #[error("inference failed: {0}")]
    Runtime(String),

    #[error("unexpected model output: {0}")]
    Output(String),
}

/// Model load failure. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read model {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("ONNX runtime error: {0}")]
    Onnx(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Read-only after load; shared across all requests.
pub trait Classifier: Send + Sync {
    /// Resolved once, at load time
    fn capability(&self) -> Capability;

    /// Probability mass of the positive (fraud) class, in 0.0..=1.0
    fn predict_proba(&self, _features: &FeatureVector) -> Result<f64, InferenceError> {
        Err(InferenceError::Unsupported)
    }

    /// `true` when the predicted label is the positive (fraud) class
    fn predict_label(&self, features: &FeatureVector) -> Result<bool, InferenceError>;

    /// Short model type name for status/logging
    fn model_type(&self) -> &str;
}

// ============================================================================
// LOADING
// ============================================================================

/// What to load and how to interpret it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelOptions {
    pub path: PathBuf,
    /// Expected SHA-256 (hex) of the artifact; skipped when None
    pub sha256: Option<String>,
    /// ONNX output holding class probabilities
    pub probability_output: String,
    /// ONNX output holding the predicted label
    pub label_output: String,
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub capability: Capability,
    pub sha256: String,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

pub struct LoadedModel {
    pub classifier: Arc<dyn Classifier>,
    pub metadata: ModelMetadata,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel").field("metadata", &self.metadata).finish()
    }
}

/// SHA-256 of the artifact bytes, lowercase hex
pub fn compute_checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Compare against an expected checksum (case-insensitive)
pub fn verify_checksum(bytes: &[u8], expected: &str) -> Result<String, ModelError> {
    let actual = compute_checksum(bytes);
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(ModelError::ChecksumMismatch {
            expected: expected.trim().to_lowercase(),
            actual,
        });
    }
    Ok(actual)
}

/// Load the classifier artifact described by `options`
pub fn load_model(options: &ModelOptions) -> Result<LoadedModel, ModelError> {
    let path = options.path.as_path();
    log::info!("Loading model from: {}", path.display());

    if !path.exists() {
        return Err(ModelError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let sha256 = match options.sha256.as_deref() {
        Some(expected) => verify_checksum(&bytes, expected)?,
        None => compute_checksum(&bytes),
    };

    let classifier: Arc<dyn Classifier> = match extension(path).as_deref() {
        Some("onnx") => Arc::new(OnnxClassifier::from_bytes(
            &bytes,
            &options.label_output,
            &options.probability_output,
        )?),
        Some("json") => Arc::new(LinearClassifier::from_json(&bytes)?),
        other => {
            return Err(ModelError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            ))
        }
    };

    let metadata = ModelMetadata {
        model_path: path.display().to_string(),
        model_type: classifier.model_type().to_string(),
        capability: classifier.capability(),
        sha256,
        loaded_at: chrono::Utc::now(),
    };

    log::info!(
        "Model loaded: type={} capability={:?} sha256={}",
        metadata.model_type,
        metadata.capability,
        metadata.sha256
    );

    Ok(LoadedModel { classifier, metadata })
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
