//! Feature Vector - Core data structure for classifier input
//!
//! **Versioned feature vector with layout validation**
//!
//! Built once per request by [`assemble`], then handed to the scorer by
//! reference. There are no setters: once assembled the values are final.

use serde::{Deserialize, Serialize};

use super::coerce::ObservedInput;
use super::impute::SynthesizedFeatures;
use super::layout::{
    layout_hash, validate_layout, LayoutMismatchError, FEATURE_COUNT, FEATURE_LAYOUT,
    FEATURE_VERSION, NORMALIZED_AMOUNT_INDEX, NORMALIZED_TIME_INDEX, OBSERVED_COUNT,
    SYNTHESIZED_COUNT, SYNTHESIZED_START,
};
use super::normalize::NormalizedFields;

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Wrap fully populated values with the current layout version
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout_hash
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Values narrowed to f32 for tensor input
    pub fn to_f32(&self) -> [f32; FEATURE_COUNT] {
        self.values.map(|v| v as f32)
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        super::layout::feature_index(name).and_then(|i| self.get(i))
    }

    /// (name, value) pairs in layout order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_LAYOUT.into_iter().zip(self.values)
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }
}

// ============================================================================
// ASSEMBLY
// ============================================================================

/// Place every component into its canonical slot
pub fn assemble(
    observed: &ObservedInput,
    synthesized: &SynthesizedFeatures,
    normalized: &NormalizedFields,
) -> FeatureVector {
    let mut values = [0.0; FEATURE_COUNT];

    values[..OBSERVED_COUNT].copy_from_slice(&observed.discriminants());
    values[SYNTHESIZED_START..SYNTHESIZED_START + SYNTHESIZED_COUNT]
        .copy_from_slice(synthesized.values());
    values[NORMALIZED_AMOUNT_INDEX] = normalized.normalized_amount;
    values[NORMALIZED_TIME_INDEX] = normalized.normalized_time;

    FeatureVector::from_values(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_values_is_compatible() {
        let vector = FeatureVector::from_values([1.5; FEATURE_COUNT]);
        assert!(vector.validate().is_ok());
        assert_eq!(vector.version(), FEATURE_VERSION);
        assert_eq!(vector.get(29), Some(1.5));
        assert_eq!(vector.get(30), None);
    }

    #[test]
    fn test_to_f32() {
        let vector = FeatureVector::from_values([0.25; FEATURE_COUNT]);
        assert_eq!(vector.to_f32(), [0.25f32; FEATURE_COUNT]);
    }

    #[test]
    fn test_get_by_name() {
        let mut values = [0.0; FEATURE_COUNT];
        values[NORMALIZED_TIME_INDEX] = 9.0;
        let vector = FeatureVector::from_values(values);
        assert_eq!(vector.get_by_name("normalized_time"), Some(9.0));
        assert_eq!(vector.get_by_name("Amount"), None);
    }
}
