use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::health::router::diagnose_handler;

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn diagnose_route_returns_full_report() {
    let (engine, _) = stub_engine();
    let router = router_for(engine);

    let response = router
        .oneshot(post_json(
            "/api/v1/diagnose",
            &serde_json::to_value(healthy_metrics()).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["health_score"], 90);
    assert_eq!(body["breakdown"]["profit_margin"]["max"], 30);
    assert_eq!(body["breakdown"]["asset_vs_debt"]["label"], "Assets vs Debt");
    assert_eq!(body["impacts"][0]["key"], "inventory_days");
    assert_eq!(body["impacts"][0]["tier"], "high");
    assert_eq!(body["impacts"][0]["status"], "optimal");
    assert!(body["explanation"].is_string());
}

#[tokio::test]
async fn diagnose_handler_maps_model_failure_to_bad_gateway() {
    let engine = Arc::new(engine_with(FailingModel, Arc::new(StubNarrator::default())));

    let response = diagnose_handler::<FailingModel, StubNarrator>(
        State(engine),
        axum::Json(healthy_metrics()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("distress model failed"));
}

#[tokio::test]
async fn diagnose_route_rejects_incomplete_metrics() {
    let (engine, _) = stub_engine();
    let router = router_for(engine);

    let response = router
        .oneshot(post_json(
            "/api/v1/diagnose",
            &json!({ "inventory_days": 20 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn simulate_route_returns_streamlined_outcome() {
    let (engine, _) = stub_engine();
    let router = router_for(engine);

    let payload = json!({
        "original": healthy_metrics(),
        "adjustments": { "total_debt": -100, "marketing_budget": 30 },
        "current_score": 90,
    });
    let response = router
        .oneshot(post_json("/api/v1/simulate", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["final_score"], 90);
    assert_eq!(body["points_change"], 0);
    assert_eq!(body["adjusted"]["total_debt"], 0.0);
    assert_eq!(body["adjusted"]["sector"], "retail");
    assert!(body.get("breakdown").is_none());
    assert!(body.get("impacts").is_none());
    assert_eq!(
        body["potential_benefits"].as_array().map(Vec::len),
        Some(1)
    );
}

#[tokio::test]
async fn simulate_route_omits_change_without_baseline() {
    let (engine, _) = stub_engine();
    let router = router_for(engine);

    let payload = json!({ "original": healthy_metrics() });
    let response = router
        .oneshot(post_json("/api/v1/simulate", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body.get("previous_score").is_none());
    assert!(body.get("points_change").is_none());
}

#[tokio::test]
async fn coach_route_reports_standing() {
    let engine = engine_with(StubModel::with_probability(0.25), Arc::new(FailingNarrator));
    let router = router_for(engine);

    let payload = json!({ "adjusted": struggling_metrics() });
    let response = router
        .oneshot(post_json("/api/v1/coach", &payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["standing"], "action_required");
    assert_eq!(body["action_steps"].as_array().map(Vec::len), Some(3));
}
