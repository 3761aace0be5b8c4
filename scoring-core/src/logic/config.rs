//! Scoring Configuration
//!
//! Everything here is fixed at process start: model artifact, normalization
//! constants, decision threshold, audit location. Values come from the
//! environment with defaults from `constants.rs`; a value that is set but
//! unusable is an error, never silently replaced.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::logic::features::{NormalizationConfig, NormalizationConstants};
use crate::logic::model::{DecisionPolicy, InvalidThreshold, ModelOptions};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name}: cannot parse '{value}' as a number")]
    InvalidNumber { name: String, value: String },

    #[error("{name}: {reason}")]
    OutOfRange { name: String, reason: String },

    #[error(transparent)]
    Threshold(#[from] InvalidThreshold),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub model: ModelOptions,
    pub normalization: NormalizationConfig,
    /// Percent, 0 - 100
    pub threshold: f64,
    pub audit_path: PathBuf,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            model: ModelOptions {
                path: PathBuf::from(DEFAULT_MODEL_PATH),
                sha256: None,
                probability_output: DEFAULT_PROBABILITY_OUTPUT.to_string(),
                label_output: DEFAULT_LABEL_OUTPUT.to_string(),
            },
            normalization: NormalizationConfig {
                amount: NormalizationConstants::new(DEFAULT_AMOUNT_MEAN, DEFAULT_AMOUNT_SCALE),
                time: NormalizationConstants::new(DEFAULT_TIME_MEAN, DEFAULT_TIME_SCALE),
            },
            threshold: DEFAULT_THRESHOLD,
            audit_path: default_audit_path(),
        }
    }
}

/// `<data_local_dir>/fraud-scoring/audit_log.csv`, or the working directory
pub fn default_audit_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(AUDIT_FILE_NAME)
}

impl ScoringConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from any name → value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let number = |name: &str, default: f64| -> Result<f64, ConfigError> {
            match text(name) {
                None => Ok(default),
                Some(value) => match value.parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(n),
                    _ => Err(ConfigError::InvalidNumber { name: name.to_string(), value }),
                },
            }
        };

        let config = Self {
            model: ModelOptions {
                path: text(ENV_MODEL_PATH).map(PathBuf::from).unwrap_or(defaults.model.path),
                sha256: text(ENV_MODEL_SHA256),
                probability_output: text(ENV_PROBABILITY_OUTPUT)
                    .unwrap_or(defaults.model.probability_output),
                label_output: text(ENV_LABEL_OUTPUT).unwrap_or(defaults.model.label_output),
            },
            normalization: NormalizationConfig {
                amount: NormalizationConstants::new(
                    number(ENV_AMOUNT_MEAN, defaults.normalization.amount.mean)?,
                    number(ENV_AMOUNT_SCALE, defaults.normalization.amount.scale)?,
                ),
                time: NormalizationConstants::new(
                    number(ENV_TIME_MEAN, defaults.normalization.time.mean)?,
                    number(ENV_TIME_SCALE, defaults.normalization.time.scale)?,
                ),
            },
            threshold: number(ENV_THRESHOLD, defaults.threshold)?,
            audit_path: text(ENV_AUDIT_LOG_PATH).map(PathBuf::from).unwrap_or(defaults.audit_path),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        DecisionPolicy::new(self.threshold)?;

        for (name, constants) in [
            (ENV_AMOUNT_SCALE, &self.normalization.amount),
            (ENV_TIME_SCALE, &self.normalization.time),
        ] {
            if constants.scale < 0.0 {
                return Err(ConfigError::OutOfRange {
                    name: name.to_string(),
                    reason: format!("scale must not be negative, got {}", constants.scale),
                });
            }
            if constants.scale == 0.0 {
                log::warn!("{} is zero, the normalized field will always be 0.0", name);
            }
        }

        Ok(())
    }

    pub fn policy(&self) -> Result<DecisionPolicy, ConfigError> {
        Ok(DecisionPolicy::new(self.threshold)?)
    }
}
