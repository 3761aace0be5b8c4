//! Model Module - Classifier, Scorer, Decision Policy
//!
//! Tách inference khỏi feature completion.
//! Dễ dàng swap model: ONNX hoặc linear JSON.

pub mod inference;
pub mod onnx;
pub mod linear;
pub mod scorer;
pub mod threshold;

// Re-export common types
pub use inference::{
    load_model, Capability, Classifier, InferenceError, LoadedModel, ModelError, ModelMetadata,
    ModelOptions,
};
pub use linear::{LinearClassifier, LinearKind};
pub use scorer::{Score, ScoreError, ScoreMethod, Scorer};
pub use threshold::{Decision, DecisionPolicy, InvalidThreshold, Verdict};
