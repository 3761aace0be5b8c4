//! Linear Classifier - JSON artifact, no runtime needed
//!
//! ```json
//! { "kind": "logistic", "coefficients": [30 floats], "intercept": -3.2 }
//! ```
//!
//! `logistic` exposes probabilities (sigmoid of the margin).
//! `linear_svm` only has a decision function, so it is label-only.

use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureVector, FEATURE_COUNT};
use super::inference::{Capability, Classifier, InferenceError, ModelError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearKind {
    Logistic,
    LinearSvm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub kind: LinearKind,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearClassifier {
    pub fn new(kind: LinearKind, coefficients: Vec<f64>, intercept: f64) -> Result<Self, ModelError> {
        let model = Self { kind, coefficients, intercept };
        model.validate()?;
        Ok(model)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_slice(bytes)
            .map_err(|e| ModelError::Invalid(format!("linear model JSON: {}", e)))?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "expected {} coefficients, got {}",
                FEATURE_COUNT,
                self.coefficients.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Invalid("non-finite coefficient".to_string()));
        }
        Ok(())
    }

    /// w·x + b
    pub fn margin(&self, features: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(features.as_slice())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LinearClassifier {
    fn capability(&self) -> Capability {
        match self.kind {
            LinearKind::Logistic => Capability::Probabilistic,
            LinearKind::LinearSvm => Capability::LabelOnly,
        }
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        match self.kind {
            LinearKind::Logistic => {
                let p = sigmoid(self.margin(features));
                if p.is_finite() {
                    Ok(p)
                } else {
                    Err(InferenceError::Output(format!("non-finite probability {}", p)))
                }
            }
            LinearKind::LinearSvm => Err(InferenceError::Unsupported),
        }
    }

    fn predict_label(&self, features: &FeatureVector) -> Result<bool, InferenceError> {
        let margin = self.margin(features);
        if margin.is_nan() {
            return Err(InferenceError::Output("NaN decision value".to_string()));
        }
        Ok(margin >= 0.0)
    }

    fn model_type(&self) -> &str {
        match self.kind {
            LinearKind::Logistic => "logistic",
            LinearKind::LinearSvm => "linear_svm",
        }
    }
}
