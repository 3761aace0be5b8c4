//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//!
//! The normalization statistics below are PLACEHOLDERS carried over from the
//! first deployment. Replace them with the exact mean/scale used when the
//! classifier was trained.

/// Default model artifact
pub const DEFAULT_MODEL_PATH: &str = "models/model.onnx";

/// ONNX output names (scikit-learn export defaults)
pub const DEFAULT_PROBABILITY_OUTPUT: &str = "output_probability";
pub const DEFAULT_LABEL_OUTPUT: &str = "output_label";

/// Decision threshold, percent
pub const DEFAULT_THRESHOLD: f64 = crate::logic::model::threshold::DEFAULT_THRESHOLD;

pub const DEFAULT_AMOUNT_MEAN: f64 = 88.35;
pub const DEFAULT_AMOUNT_SCALE: f64 = 250.12;
pub const DEFAULT_TIME_MEAN: f64 = 47000.0;
pub const DEFAULT_TIME_SCALE: f64 = 29000.0;

/// Audit file name inside the data directory
pub const AUDIT_FILE_NAME: &str = "audit_log.csv";

/// App data directory name
pub const APP_DIR_NAME: &str = "fraud-scoring";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// Environment variable names
// ============================================

pub const ENV_MODEL_PATH: &str = "FRAUD_MODEL_PATH";
pub const ENV_MODEL_SHA256: &str = "FRAUD_MODEL_SHA256";
pub const ENV_PROBABILITY_OUTPUT: &str = "FRAUD_PROBABILITY_OUTPUT";
pub const ENV_LABEL_OUTPUT: &str = "FRAUD_LABEL_OUTPUT";
pub const ENV_THRESHOLD: &str = "FRAUD_THRESHOLD";
pub const ENV_AMOUNT_MEAN: &str = "AMOUNT_MEAN";
pub const ENV_AMOUNT_SCALE: &str = "AMOUNT_SCALE";
pub const ENV_TIME_MEAN: &str = "TIME_MEAN";
pub const ENV_TIME_SCALE: &str = "TIME_SCALE";
pub const ENV_AUDIT_LOG_PATH: &str = "AUDIT_LOG_PATH";
