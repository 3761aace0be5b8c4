//! Features Module - Feature Completion Engine
//!
//! Raw partial input → full, ordered feature vector:
//! coerce → impute → normalize → assemble.

pub mod layout;
pub mod coerce;
pub mod impute;
pub mod normalize;
pub mod vector;


// Re-export common types
pub use layout::{LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
pub use coerce::{coerce, ObservedInput, RawInput};
pub use impute::{synthesize, SynthesizedFeatures};
pub use normalize::{normalize, NormalizationConfig, NormalizationConstants, NormalizedFields};
pub use vector::{assemble, FeatureVector};

/// Completed features for one request
#[derive(Debug, Clone)]
pub struct CompletedFeatures {
    pub observed: ObservedInput,
    pub synthesized: SynthesizedFeatures,
    pub vector: FeatureVector,
}

/// Run the whole completion chain on raw input
pub fn complete(raw: &RawInput, normalization: &NormalizationConfig) -> CompletedFeatures {
    let observed = coerce(raw);
    let synthesized = synthesize(&observed);
    let normalized = normalize(observed.amount, observed.time, normalization);
    let vector = assemble(&observed, &synthesized, &normalized);

    CompletedFeatures { observed, synthesized, vector }
}
