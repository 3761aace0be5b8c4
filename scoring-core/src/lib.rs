//! Fraud Scoring Core
//!
//! Scores a transaction for fraud risk from a partial, user-supplied feature
//! vector:
//!
//! ```text
//! raw form fields ──► coerce ──► impute V5..V28 ──► normalize amount/time
//!                                                          │
//!            audit CSV ◄── decide (threshold) ◄── score ◄──┘
//! ```
//!
//! The request layer hands over raw strings; the core never fails on bad
//! input, only on a classifier that fails on both the probability and the
//! label path.

pub mod constants;
pub mod logic;

pub use logic::config::{ConfigError, ScoringConfig};
pub use logic::features::{LayoutInfo, RawInput};
pub use logic::model::{Decision, Verdict};
pub use logic::pipeline::{EngineStatus, PipelineError, ScoreOutcome, ScoringPipeline};
