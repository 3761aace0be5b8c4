//! Logic Module - Feature completion, scoring & audit engines
//!
//! ## Architecture
//! - `features/` - Schema, coercion, imputation, normalization, assembly
//! - `model/` - Classifier capability, scorer, decision policy
//! - `audit/` - Append-only CSV decision trail
//! - `pipeline` - Orchestration + engine counters
//! - `config` - Startup configuration

pub mod config;
pub mod features;
pub mod model;
pub mod audit;
pub mod pipeline;
