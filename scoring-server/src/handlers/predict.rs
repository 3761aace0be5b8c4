//! Prediction handler
//!
//! `POST /predict` with form fields `V1..V4, Amount, Time`. Field values go
//! to the core untouched: blanks and garbage become 0.0 there, so a request
//! only fails when the classifier itself cannot produce a decision.

use std::collections::HashMap;

use axum::{extract::State, Form, Json};
use serde::Serialize;

use scoring_core::logic::model::ScoreMethod;
use scoring_core::{RawInput, ScoreOutcome, Verdict};

use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct NamedValue {
    pub name: &'static str,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub probability: f64,
    pub verdict: Verdict,
    pub threshold: f64,
    pub summary: String,
    pub method: ScoreMethod,
    /// V5..V28 in layout order
    pub synthesized: Vec<NamedValue>,
    pub audit_logged: bool,
}

impl From<ScoreOutcome> for PredictResponse {
    fn from(outcome: ScoreOutcome) -> Self {
        Self {
            probability: outcome.decision.probability,
            verdict: outcome.decision.verdict,
            threshold: outcome.decision.threshold,
            summary: outcome.decision.summary(),
            method: outcome.method,
            synthesized: outcome
                .synthesized
                .named()
                .map(|(name, value)| NamedValue { name, value })
                .collect(),
            audit_logged: outcome.audit_logged,
        }
    }
}

pub async fn predict(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> AppResult<Json<PredictResponse>> {
    let raw = RawInput::from(fields);
    let pipeline = state.pipeline.clone();

    // classifier + audit append block; keep them off the async workers
    let outcome = tokio::task::spawn_blocking(move || pipeline.score(&raw)).await??;

    tracing::info!(
        verdict = %outcome.decision.verdict,
        probability = outcome.decision.probability,
        audit_logged = outcome.audit_logged,
        "Transaction scored"
    );

    Ok(Json(PredictResponse::from(outcome)))
}
