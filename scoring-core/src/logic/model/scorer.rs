//! Scorer - classifier output → risk percentage
//!
//! Probability path first (when the model is probabilistic). Any failure or a
//! non-finite value drops to the label path: fraud label → 100.0, else 0.0.
//! Only when both paths fail does the request fail.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::logic::features::FeatureVector;
use super::inference::{Capability, Classifier, InferenceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMethod {
    Probability,
    LabelFallback,
}

/// Scorer output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Risk percentage, 0.0 - 100.0
    pub probability: f64,
    pub method: ScoreMethod,
}

#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("classifier failed on both paths (probability: {probability}; label: {label})")]
    ClassifierFailed {
        probability: String,
        label: InferenceError,
    },
}

pub struct Scorer {
    classifier: Arc<dyn Classifier>,
    capability: Capability,
}

impl Scorer {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        let capability = classifier.capability();
        Self { classifier, capability }
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn score(&self, features: &FeatureVector) -> Result<Score, ScoreError> {
        let probability_failure = match self.capability {
            Capability::Probabilistic => match self.classifier.predict_proba(features) {
                Ok(p) if p.is_finite() => {
                    return Ok(Score {
                        probability: (p * 100.0).clamp(0.0, 100.0),
                        method: ScoreMethod::Probability,
                    });
                }
                Ok(p) => format!("non-finite probability {}", p),
                Err(e) => e.to_string(),
            },
            Capability::LabelOnly => InferenceError::Unsupported.to_string(),
        };

        if self.capability == Capability::Probabilistic {
            log::warn!("Probability path failed ({}), using label fallback", probability_failure);
        }

        match self.classifier.predict_label(features) {
            Ok(is_fraud) => Ok(Score {
                probability: if is_fraud { 100.0 } else { 0.0 },
                method: ScoreMethod::LabelFallback,
            }),
            Err(label) => Err(ScoreError::ClassifierFailed {
                probability: probability_failure,
                label,
            }),
        }
    }
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer")
            .field("model_type", &self.classifier.model_type())
            .field("capability", &self.capability)
            .finish()
    }
}
