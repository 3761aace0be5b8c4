//! Normalizer - rescale amount/time with fixed training statistics

use serde::{Deserialize, Serialize};

/// (mean, scale) pair for one field. Fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationConstants {
    pub mean: f64,
    pub scale: f64,
}

impl NormalizationConstants {
    pub const fn new(mean: f64, scale: f64) -> Self {
        Self { mean, scale }
    }

    /// `(value - mean) / scale`; a zero scale yields 0.0
    pub fn apply(&self, value: f64) -> f64 {
        if self.scale == 0.0 {
            return 0.0;
        }
        (value - self.mean) / self.scale
    }
}

/// Constants for both normalized fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationConfig {
    pub amount: NormalizationConstants,
    pub time: NormalizationConstants,
}

/// Normalized (amount, time)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFields {
    pub normalized_amount: f64,
    pub normalized_time: f64,
}

pub fn normalize(amount: f64, time: f64, config: &NormalizationConfig) -> NormalizedFields {
    NormalizedFields {
        normalized_amount: config.amount.apply(amount),
        normalized_time: config.time.apply(time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NormalizationConfig {
        NormalizationConfig {
            amount: NormalizationConstants::new(88.35, 250.12),
            time: NormalizationConstants::new(47000.0, 29000.0),
        }
    }

    #[test]
    fn test_normalize_example() {
        let n = normalize(250.0, 50000.0, &config());
        assert!((n.normalized_amount - 0.6463).abs() < 1e-3, "{}", n.normalized_amount);
        assert!((n.normalized_time - 0.1034).abs() < 1e-4, "{}", n.normalized_time);
    }

    #[test]
    fn test_zero_scale_is_neutral() {
        let zero = NormalizationConfig {
            amount: NormalizationConstants::new(10.0, 0.0),
            time: NormalizationConstants::new(0.0, 0.0),
        };
        let n = normalize(1e9, -5.0, &zero);
        assert_eq!(n.normalized_amount, 0.0);
        assert_eq!(n.normalized_time, 0.0);
        assert!(n.normalized_amount.is_finite());
    }

    #[test]
    fn test_at_mean_is_zero() {
        let n = normalize(88.35, 47000.0, &config());
        assert_eq!(n.normalized_amount, 0.0);
        assert_eq!(n.normalized_time, 0.0);
    }
}
