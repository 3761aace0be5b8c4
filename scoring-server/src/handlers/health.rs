//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use scoring_core::EngineStatus;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    engine: EngineStatus,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let engine = state.pipeline.status();

    // audit loss is an operator problem, not a request failure
    let status = if engine.audit.failures > 0 { "degraded" } else { "healthy" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        engine,
    })
}
