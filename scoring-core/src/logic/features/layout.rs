//! Feature Layout - Canonical Feature Schema
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! The classifier was trained on exactly this column order. Anything that
//! builds a feature vector goes through the indices defined here.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Total number of features
pub const FEATURE_COUNT: usize = 30;

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [
    // === Observed discriminants (0-3) ===
    "V1", "V2", "V3", "V4",

    // === Synthesized (4-27) ===
    "V5", "V6", "V7", "V8", "V9", "V10", "V11", "V12",
    "V13", "V14", "V15", "V16", "V17", "V18", "V19", "V20",
    "V21", "V22", "V23", "V24", "V25", "V26", "V27", "V28",

    // === Derived (28-29) ===
    "normalized_amount",
    "normalized_time",
];

/// Number of caller-supplied discriminants (V1..V4)
pub const OBSERVED_COUNT: usize = 4;

/// First synthesized slot (V5)
pub const SYNTHESIZED_START: usize = 4;

/// Number of synthesized slots (V5..V28)
pub const SYNTHESIZED_COUNT: usize = 24;

pub const NORMALIZED_AMOUNT_INDEX: usize = 28;
pub const NORMALIZED_TIME_INDEX: usize = 29;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone, thiserror::Error)]
#[error(
    "Feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), \
     got v{actual_version} (hash: {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Validate that incoming data matches current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

/// Names of the synthesized slots, V5..V28
pub fn synthesized_names() -> &'static [&'static str] {
    let layout: &'static [&'static str; FEATURE_COUNT] = &FEATURE_LAYOUT;
    &layout[SYNTHESIZED_START..SYNTHESIZED_START + SYNTHESIZED_COUNT]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
        assert_eq!(OBSERVED_COUNT + SYNTHESIZED_COUNT + 2, FEATURE_COUNT);
    }

    #[test]
    fn test_layout_order() {
        for i in 1..=28 {
            assert_eq!(feature_index(&format!("V{}", i)), Some(i - 1));
        }
        assert_eq!(feature_name(NORMALIZED_AMOUNT_INDEX), Some("normalized_amount"));
        assert_eq!(feature_name(NORMALIZED_TIME_INDEX), Some("normalized_time"));
        assert_eq!(feature_name(30), None);
    }

    #[test]
    fn test_synthesized_names() {
        let names = synthesized_names();
        assert_eq!(names.len(), SYNTHESIZED_COUNT);
        assert_eq!(names[0], "V5");
        assert_eq!(names[SYNTHESIZED_COUNT - 1], "V28");
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(compute_layout_hash(), compute_layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout(FEATURE_VERSION, layout_hash()).is_ok());
        assert!(validate_layout(FEATURE_VERSION + 1, layout_hash()).is_err());
        assert!(validate_layout(FEATURE_VERSION, layout_hash().wrapping_add(1)).is_err());
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.feature_names.len(), FEATURE_COUNT);
        assert_eq!(info.feature_names[0], "V1");
    }
}
