//! Decision Policy - risk percentage → verdict
//!
//! Một ngưỡng duy nhất: `probability >= threshold` là Fraud.
//! No hysteresis, no confidence bands.

use serde::{Deserialize, Serialize};

/// Default threshold (percent). Matches the classifier's own 0.5 cut.
pub const DEFAULT_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Fraud,
    Legit,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Fraud => "Fraud",
            Verdict::Legit => "Legit",
        }
    }

    /// Human label, without any presentation styling
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Fraud => "Fraudulent Transaction",
            Verdict::Legit => "Legitimate Transaction",
        }
    }

    pub fn is_fraud(&self) -> bool {
        matches!(self, Verdict::Fraud)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Final decision for one request. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Risk percentage, 0.0 - 100.0
    pub probability: f64,
    pub verdict: Verdict,
    pub threshold: f64,
}

impl Decision {
    /// e.g. "Fraudulent Transaction (Risk: 42.70%)"
    pub fn summary(&self) -> String {
        format!("{} (Risk: {:.2}%)", self.verdict.label(), self.probability)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("threshold must be a percentage in [0, 100], got {0}")]
pub struct InvalidThreshold(pub f64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    threshold: f64,
}

impl DecisionPolicy {
    pub fn new(threshold: f64) -> Result<Self, InvalidThreshold> {
        if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
            return Err(InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn verdict(&self, probability: f64) -> Verdict {
        if probability >= self.threshold {
            Verdict::Fraud
        } else {
            Verdict::Legit
        }
    }

    pub fn decide(&self, probability: f64) -> Decision {
        Decision {
            probability,
            verdict: self.verdict(probability),
            threshold: self.threshold,
        }
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_decision() {
        let policy = DecisionPolicy::new(30.0).unwrap();
        let decision = policy.decide(42.7);
        assert_eq!(decision.verdict, Verdict::Fraud);
        assert_eq!(decision.threshold, 30.0);
        assert_eq!(decision.summary(), "Fraudulent Transaction (Risk: 42.70%)");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let policy = DecisionPolicy::new(30.0).unwrap();
        assert_eq!(policy.verdict(30.0), Verdict::Fraud);
        assert_eq!(policy.verdict(29.999), Verdict::Legit);
    }

    #[test]
    fn test_threshold_monotonicity() {
        for t in [0.0, 12.5, 50.0, 99.0, 100.0] {
            let policy = DecisionPolicy::new(t).unwrap();
            let mut p = 0.0;
            while p <= 100.0 {
                let expected = if p < t { Verdict::Legit } else { Verdict::Fraud };
                assert_eq!(policy.verdict(p), expected, "p={} t={}", p, t);
                p += 0.5;
            }
        }
    }

    #[test]
    fn test_rejects_invalid_threshold() {
        assert!(DecisionPolicy::new(-1.0).is_err());
        assert!(DecisionPolicy::new(100.5).is_err());
        assert!(DecisionPolicy::new(f64::NAN).is_err());
    }

    #[test]
    fn test_default_policy() {
        let policy = DecisionPolicy::default();
        assert_eq!(policy.threshold(), DEFAULT_THRESHOLD);
        assert_eq!(policy.decide(0.0).summary(), "Legitimate Transaction (Risk: 0.00%)");
    }
}
