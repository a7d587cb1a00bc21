use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::domain::BusinessMetrics;
use super::model::DistressModel;
use super::narration::Narrator;
use super::service::{CoachRequest, EngineError, HealthEngine, SimulationRequest};

/// Router exposing diagnosis, simulation and coaching over JSON.
pub fn health_router<M, N>(engine: Arc<HealthEngine<M, N>>) -> Router
where
    M: DistressModel + 'static,
    N: Narrator + 'static,
{
    Router::new()
        .route("/api/v1/diagnose", post(diagnose_handler::<M, N>))
        .route("/api/v1/simulate", post(simulate_handler::<M, N>))
        .route("/api/v1/coach", post(coach_handler::<M, N>))
        .with_state(engine)
}

pub(crate) async fn diagnose_handler<M, N>(
    State(engine): State<Arc<HealthEngine<M, N>>>,
    axum::Json(metrics): axum::Json<BusinessMetrics>,
) -> Response
where
    M: DistressModel + 'static,
    N: Narrator + 'static,
{
    match engine.diagnose(&metrics).await {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => engine_failure(error),
    }
}

pub(crate) async fn simulate_handler<M, N>(
    State(engine): State<Arc<HealthEngine<M, N>>>,
    axum::Json(request): axum::Json<SimulationRequest>,
) -> Response
where
    M: DistressModel + 'static,
    N: Narrator + 'static,
{
    match engine.simulate(&request).await {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => engine_failure(error),
    }
}

pub(crate) async fn coach_handler<M, N>(
    State(engine): State<Arc<HealthEngine<M, N>>>,
    axum::Json(request): axum::Json<CoachRequest>,
) -> Response
where
    M: DistressModel + 'static,
    N: Narrator + 'static,
{
    match engine.coach(&request).await {
        Ok(plan) => (StatusCode::OK, axum::Json(plan)).into_response(),
        Err(error) => engine_failure(error),
    }
}

fn engine_failure(error: EngineError) -> Response {
    tracing::error!(error = %error, "health request failed");
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
}
