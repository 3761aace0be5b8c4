//! Input Coercer - raw form strings → typed observed input
//!
//! Fail open to default: field thiếu, rỗng hoặc không parse được đều thành 0.0.
//! Malformed input degrades scoring quality but never aborts the request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Fields the caller may supply, in seed order
pub const OBSERVED_FIELDS: [&str; 6] = ["V1", "V2", "V3", "V4", "Amount", "Time"];

/// Value used for any absent or malformed field
pub const DEFAULT_VALUE: f64 = 0.0;

// ============================================================================
// RAW INPUT
// ============================================================================

/// Field name → raw string, as handed over by the request layer.
/// A missing key means the field was not supplied.
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    fields: HashMap<String, String>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl From<HashMap<String, String>> for RawInput {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// ============================================================================
// OBSERVED INPUT
// ============================================================================

/// Coerced caller-supplied values. Amount and time are still raw here.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObservedInput {
    #[serde(rename = "V1")]
    pub v1: f64,
    #[serde(rename = "V2")]
    pub v2: f64,
    #[serde(rename = "V3")]
    pub v3: f64,
    #[serde(rename = "V4")]
    pub v4: f64,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Time")]
    pub time: f64,
}

impl ObservedInput {
    /// V1..V4 in layout order
    pub fn discriminants(&self) -> [f64; 4] {
        [self.v1, self.v2, self.v3, self.v4]
    }

    /// All six values in `OBSERVED_FIELDS` order
    pub fn as_array(&self) -> [f64; 6] {
        [self.v1, self.v2, self.v3, self.v4, self.amount, self.time]
    }

    pub fn from_array(values: [f64; 6]) -> Self {
        let [v1, v2, v3, v4, amount, time] = values;
        Self { v1, v2, v3, v4, amount, time }
    }
}

// ============================================================================
// COERCION
// ============================================================================

/// Parse one raw field. Absent, blank, unparsable and non-finite all
/// resolve to `DEFAULT_VALUE`.
pub fn parse_field(raw: Option<&str>) -> f64 {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return DEFAULT_VALUE;
    };

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        Ok(_) | Err(_) => {
            log::debug!("Unusable numeric field {:?}, defaulting to {}", text, DEFAULT_VALUE);
            DEFAULT_VALUE
        }
    }
}

/// Convert the raw form mapping into typed values
pub fn coerce(raw: &RawInput) -> ObservedInput {
    let mut values = [DEFAULT_VALUE; 6];
    for (slot, name) in values.iter_mut().zip(OBSERVED_FIELDS) {
        *slot = parse_field(raw.get(name));
    }
    ObservedInput::from_array(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_valid() {
        assert_eq!(parse_field(Some("-1.2")), -1.2);
        assert_eq!(parse_field(Some("  250.00 ")), 250.0);
        assert_eq!(parse_field(Some("1e3")), 1000.0);
    }

    #[test]
    fn test_parse_field_defaults() {
        assert_eq!(parse_field(None), 0.0);
        assert_eq!(parse_field(Some("")), 0.0);
        assert_eq!(parse_field(Some("   ")), 0.0);
        assert_eq!(parse_field(Some("abc")), 0.0);
        assert_eq!(parse_field(Some("1.2.3")), 0.0);
    }

    #[test]
    fn test_parse_field_non_finite() {
        assert_eq!(parse_field(Some("NaN")), 0.0);
        assert_eq!(parse_field(Some("inf")), 0.0);
        assert_eq!(parse_field(Some("-infinity")), 0.0);
    }

    #[test]
    fn test_coerce_example() {
        let raw = RawInput::new()
            .with("V1", "-1.2")
            .with("V2", "")
            .with("V3", "0.5")
            .with("V4", "abc")
            .with("Amount", "250.00")
            .with("Time", "50000");

        let observed = coerce(&raw);
        assert_eq!(
            observed,
            ObservedInput { v1: -1.2, v2: 0.0, v3: 0.5, v4: 0.0, amount: 250.0, time: 50000.0 }
        );
    }

    #[test]
    fn test_coerce_empty_input() {
        let observed = coerce(&RawInput::new());
        assert_eq!(observed, ObservedInput::default());
    }

    #[test]
    fn test_coerce_ignores_unknown_fields() {
        let raw: RawInput = [("V5", "3.0"), ("V1", "2.0"), ("Amount", "7")].into_iter().collect();
        let observed = coerce(&raw);
        assert_eq!(observed.v1, 2.0);
        assert_eq!(observed.amount, 7.0);
        assert_eq!(observed.discriminants(), [2.0, 0.0, 0.0, 0.0]);
    }
}
