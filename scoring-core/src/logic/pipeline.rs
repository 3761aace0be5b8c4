//! Scoring Pipeline - raw input → decision → audit trail
//!
//! raw → coerce → impute → normalize → assemble → score → decide → audit.
//!
//! Every stage before the audit append is a pure function of the request, so
//! one pipeline instance is shared by all request handlers. The only shared
//! mutable state is the audit log and the counters below.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::logic::audit::{AuditLog, AuditRecord, AuditStats};
use crate::logic::config::{ConfigError, ScoringConfig};
use crate::logic::features::{self, LayoutInfo, NormalizationConfig, ObservedInput, RawInput, SynthesizedFeatures};
use crate::logic::model::{
    load_model, Capability, Classifier, Decision, DecisionPolicy, ModelError, ModelMetadata,
    ScoreError, ScoreMethod, Scorer,
};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("model load failed: {0}")]
    Model(#[from] ModelError),

    #[error("scoring failed: {0}")]
    Score(#[from] ScoreError),
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Result of one scoring request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub decision: Decision,
    pub method: ScoreMethod,
    pub observed: ObservedInput,
    pub synthesized: SynthesizedFeatures,
    /// False when the audit append failed (the decision still stands)
    pub audit_logged: bool,
}

/// Engine status for operators
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub model: Option<ModelMetadata>,
    pub capability: Capability,
    pub threshold: f64,
    pub requests_scored: u64,
    pub scoring_failures: u64,
    pub label_fallbacks: u64,
    pub avg_latency_ms: f64,
    pub audit: AuditStats,
    pub layout: LayoutInfo,
}

#[derive(Debug, Default)]
struct Counters {
    scored: AtomicU64,
    failures: AtomicU64,
    label_fallbacks: AtomicU64,
    latency_sum_us: AtomicU64,
}

// ============================================================================
// PIPELINE
// ============================================================================

#[derive(Debug)]
pub struct ScoringPipeline {
    normalization: NormalizationConfig,
    scorer: Scorer,
    policy: DecisionPolicy,
    audit: AuditLog,
    model: Option<ModelMetadata>,
    counters: Counters,
}

impl ScoringPipeline {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        normalization: NormalizationConfig,
        policy: DecisionPolicy,
        audit: AuditLog,
    ) -> Self {
        Self {
            normalization,
            scorer: Scorer::new(classifier),
            policy,
            audit,
            model: None,
            counters: Counters::default(),
        }
    }

    /// Load the model and wire every stage from configuration.
    /// Any error here must keep the service from serving requests.
    pub fn from_config(config: &ScoringConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let policy = config.policy()?;
        let loaded = load_model(&config.model)?;

        log::info!(
            "Scoring pipeline ready: threshold={} audit={}",
            policy.threshold(),
            config.audit_path.display()
        );

        let mut pipeline = Self::new(
            loaded.classifier,
            config.normalization,
            policy,
            AuditLog::new(&config.audit_path),
        );
        pipeline.model = Some(loaded.metadata);
        Ok(pipeline)
    }

    /// Score one request. Fails only when the classifier fails on both paths.
    pub fn score(&self, raw: &RawInput) -> Result<ScoreOutcome, PipelineError> {
        let start = Instant::now();

        let completed = features::complete(raw, &self.normalization);

        let score = match self.scorer.score(&completed.vector) {
            Ok(score) => score,
            Err(e) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                log::error!("Scoring failed: {}", e);
                return Err(e.into());
            }
        };

        if score.method == ScoreMethod::LabelFallback {
            self.counters.label_fallbacks.fetch_add(1, Ordering::Relaxed);
        }

        let decision = self.policy.decide(score.probability);

        let record = AuditRecord::new(completed.observed, completed.synthesized, &decision);
        let audit_logged = self.audit.log(&record);

        self.counters.scored.fetch_add(1, Ordering::Relaxed);
        self.counters
            .latency_sum_us
            .fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);

        log::debug!(
            "Scored transaction: probability={:.2} verdict={} method={:?}",
            decision.probability,
            decision.verdict,
            score.method
        );

        Ok(ScoreOutcome {
            decision,
            method: score.method,
            observed: completed.observed,
            synthesized: completed.synthesized,
            audit_logged,
        })
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    pub fn status(&self) -> EngineStatus {
        let scored = self.counters.scored.load(Ordering::Relaxed);
        let sum = self.counters.latency_sum_us.load(Ordering::Relaxed);
        let avg = if scored > 0 { (sum as f64 / scored as f64) / 1000.0 } else { 0.0 };

        EngineStatus {
            model: self.model.clone(),
            capability: self.scorer.capability(),
            threshold: self.policy.threshold(),
            requests_scored: scored,
            scoring_failures: self.counters.failures.load(Ordering::Relaxed),
            label_fallbacks: self.counters.label_fallbacks.load(Ordering::Relaxed),
            avg_latency_ms: avg,
            audit: self.audit.stats(),
            layout: LayoutInfo::current(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
