//! Fraud Scoring Server
//!
//! Thin request layer over `scoring-core`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    FRAUD SCORING SERVER                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   form fields   ┌─────────────────────────┐ │
//! │  │  Axum     │ ──────────────► │  ScoringPipeline        │ │
//! │  │  Router   │ ◄────────────── │  (spawn_blocking)       │ │
//! │  └───────────┘   decision      └────────────┬────────────┘ │
//! │                                             ▼              │
//! │                                     ┌──────────────┐       │
//! │                                     │  audit CSV   │       │
//! │                                     └──────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod handlers;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scoring_core::ScoringPipeline;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG / LOG_FORMAT from it apply
    dotenvy::dotenv().ok();

    // Initialize logging (also forwards the core's `log` records)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "scoring_server=debug,scoring_core=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config::json_logs_enabled() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let config = config::Config::from_env().context("invalid configuration")?;

    tracing::info!("Fraud Scoring Server v{} starting...", scoring_core::constants::APP_VERSION);
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("Model: {}", config.scoring.model.path.display());

    // No model, no service
    let pipeline = ScoringPipeline::from_config(&config.scoring)
        .context("failed to initialize scoring pipeline")?;

    if config.is_production() && config.scoring.model.sha256.is_none() {
        tracing::warn!("Running in production without model checksum verification");
    }

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ScoringPipeline>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .route("/api/v1/schema", get(handlers::schema::get))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use scoring_core::logic::audit::{read_records, AuditLog};
    use scoring_core::logic::features::{FeatureVector, NormalizationConfig, NormalizationConstants, FEATURE_COUNT};
    use scoring_core::logic::model::{
        Capability, Classifier, DecisionPolicy, InferenceError, LinearClassifier, LinearKind,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn normalization() -> NormalizationConfig {
        NormalizationConfig {
            amount: NormalizationConstants::new(88.35, 250.12),
            time: NormalizationConstants::new(47000.0, 29000.0),
        }
    }

    fn state(classifier: Arc<dyn Classifier>, audit: AuditLog) -> AppState {
        AppState {
            pipeline: Arc::new(ScoringPipeline::new(
                classifier,
                normalization(),
                DecisionPolicy::new(30.0).unwrap(),
                audit,
            )),
        }
    }

    fn form(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    struct Broken;

    impl Classifier for Broken {
        fn capability(&self) -> Capability {
            Capability::LabelOnly
        }
        fn predict_label(&self, _: &FeatureVector) -> Result<bool, InferenceError> {
            Err(InferenceError::Runtime("session poisoned".to_string()))
        }
        fn model_type(&self) -> &str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_predict_with_partial_form() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit_log.csv");
        // zero weights: p = 0.5 → 50% ≥ 30% → Fraud
        let model = LinearClassifier::new(LinearKind::Logistic, vec![0.0; FEATURE_COUNT], 0.0).unwrap();
        let app = create_router(state(Arc::new(model), AuditLog::new(&path)));

        let response = app
            .oneshot(form("V1=-1.2&V2=&V3=0.5&V4=abc&Amount=250.00&Time=50000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["verdict"], "Fraud");
        assert_eq!(body["threshold"], 30.0);
        assert_eq!(body["method"], "probability");
        assert_eq!(body["summary"], "Fraudulent Transaction (Risk: 50.00%)");
        assert_eq!(body["audit_logged"], true);

        let synthesized = body["synthesized"].as_array().unwrap();
        assert_eq!(synthesized.len(), 24);
        assert_eq!(synthesized[0]["name"], "V5");
        assert_eq!(synthesized[23]["name"], "V28");

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].observed.v1, -1.2);
        assert_eq!(records[0].observed.v4, 0.0);
    }

    #[tokio::test]
    async fn test_predict_with_empty_form() {
        let dir = tempfile::tempdir().unwrap();
        let model = LinearClassifier::new(LinearKind::LinearSvm, vec![0.0; FEATURE_COUNT], -1.0).unwrap();
        let app = create_router(state(Arc::new(model), AuditLog::new(dir.path().join("a.csv"))));

        let response = app.oneshot(form("")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["verdict"], "Legit");
        assert_eq!(body["probability"], 0.0);
        assert_eq!(body["method"], "label_fallback");
    }

    #[tokio::test]
    async fn test_classifier_failure_is_not_a_legit_score() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit_log.csv");
        let app = create_router(state(Arc::new(Broken), AuditLog::new(&path)));

        let response = app.oneshot(form("V1=1&Amount=5")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = json_body(response).await;
        assert_eq!(body["status"], 503);
        assert!(body.get("verdict").is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_health_reports_engine() {
        let dir = tempfile::tempdir().unwrap();
        let model = LinearClassifier::new(LinearKind::Logistic, vec![0.0; FEATURE_COUNT], 0.0).unwrap();
        let app = create_router(state(Arc::new(model), AuditLog::new(dir.path().join("a.csv"))));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["engine"]["capability"], "probabilistic");
        assert_eq!(body["engine"]["layout"]["feature_count"], 30);
    }

    #[tokio::test]
    async fn test_schema_lists_features_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let model = LinearClassifier::new(LinearKind::Logistic, vec![0.0; FEATURE_COUNT], 0.0).unwrap();
        let app = create_router(state(Arc::new(model), AuditLog::new(dir.path().join("a.csv"))));

        let response = app
            .oneshot(Request::builder().uri("/api/v1/schema").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = json_body(response).await;
        let names = body["feature_names"].as_array().unwrap();
        assert_eq!(names.len(), 30);
        assert_eq!(names[0], "V1");
        assert_eq!(names[28], "normalized_amount");
        assert_eq!(names[29], "normalized_time");
    }
}
