use super::common::*;
use std::sync::Arc;

use crate::health::narration::{NarrationMode, FALLBACK_EXPLANATION};
use crate::health::{
    CoachRequest, EngineError, ImpactTier, ModelError, ResultStatus, SliderKey, SliderStatus,
    Standing,
};

#[tokio::test]
async fn diagnose_blends_rule_score_with_model_probability() {
    let (engine, narrator) = stub_engine();

    let report = engine
        .diagnose(&healthy_metrics())
        .await
        .expect("diagnosis succeeds");

    // 100 * 0.6 + (1 - 0.25) * 100 * 0.4
    assert_eq!(report.health_score, 90);
    assert_eq!(report.breakdown.total(), 100);
    assert_eq!(report.status, ResultStatus::Success);
    assert_eq!(report.explanation, "Your business is in great shape.");

    let requests = narrator.explained();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].mode, NarrationMode::Diagnosis);
    assert_eq!(requests[0].health_score, 90);
    assert_eq!(requests[0].sector, "retail");
}

#[tokio::test]
async fn narrator_failure_degrades_to_fallback_text() {
    let engine = engine_with(StubModel::with_probability(0.25), Arc::new(FailingNarrator));

    let report = engine
        .diagnose(&healthy_metrics())
        .await
        .expect("narration failure is not fatal");

    assert_eq!(report.explanation, FALLBACK_EXPLANATION);
    assert_eq!(report.status, ResultStatus::Success);
    assert_eq!(report.health_score, 90);
}

#[tokio::test]
async fn model_failure_fails_the_whole_request() {
    let narrator = Arc::new(StubNarrator::default());
    let engine = engine_with(FailingModel, narrator.clone());

    match engine.diagnose(&healthy_metrics()).await {
        Err(EngineError::Model(ModelError::ShapeMismatch { expected, found })) => {
            assert_eq!((expected, found), (10, 9));
        }
        other => panic!("expected model failure, got {other:?}"),
    }
    assert!(
        narrator.explained().is_empty(),
        "narrator should not be asked after a model failure"
    );
}

#[test]
fn impacts_are_grouped_by_tier_in_canonical_order() {
    let (engine, _) = stub_engine();

    let assessment = engine.assess(&healthy_metrics()).expect("assessment");
    let keys: Vec<SliderKey> = assessment.impacts.iter().map(|impact| impact.key).collect();

    assert_eq!(
        keys,
        vec![
            SliderKey::InventoryDays,
            SliderKey::TotalAssets,
            SliderKey::TotalDebt,
            SliderKey::MonthlyCashSurplus,
            SliderKey::MonthlyWages,
            SliderKey::MonthlyLoanPayment,
        ]
    );
    assert_eq!(assessment.impacts[0].tier, ImpactTier::High);
    assert_eq!(assessment.impacts[1].tier, ImpactTier::Medium);
    assert_eq!(assessment.impacts[5].tier, ImpactTier::Low);

    let total: f64 = assessment
        .impacts
        .iter()
        .map(|impact| impact.impact_share)
        .sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn healthy_business_has_every_slider_optimal() {
    let (engine, _) = stub_engine();

    let assessment = engine.assess(&healthy_metrics()).expect("assessment");

    assert_eq!(assessment.hand_score, 100);
    assert!(assessment
        .impacts
        .iter()
        .all(|impact| impact.status == SliderStatus::Optimal));
}

#[test]
fn struggling_business_needs_improvement_everywhere() {
    let (engine, _) = stub_engine();

    let assessment = engine.assess(&struggling_metrics()).expect("assessment");

    assert_eq!(assessment.hand_score, 5);
    assert!(assessment.health_score < 70);
    assert!(assessment
        .impacts
        .iter()
        .all(|impact| impact.status == SliderStatus::NeedsImprovement));
}

#[test]
fn out_of_range_probability_is_clamped() {
    let engine = engine_with(
        StubModel::with_probability(-3.0),
        Arc::new(StubNarrator::default()),
    );

    let assessment = engine.assess(&healthy_metrics()).expect("assessment");

    assert_eq!(assessment.health_score, 100);
}

#[tokio::test]
async fn coach_returns_the_narrated_plan() {
    let (engine, narrator) = stub_engine();

    let plan = engine
        .coach(&CoachRequest {
            adjusted: healthy_metrics(),
            final_score: None,
        })
        .await
        .expect("plan");

    assert_eq!(plan.projected_score, 90);
    assert_eq!(plan.standing, Standing::Stable);
    assert_eq!(plan.action_steps, vec!["Collect payments within two weeks."]);

    let planned = narrator.planned();
    assert_eq!(planned.len(), 1);
    assert_eq!(planned[0].score, 90);
    assert_eq!(planned[0].impacts.len(), SliderKey::COUNT);
}

#[tokio::test]
async fn coach_falls_back_to_static_plan() {
    let engine = engine_with(StubModel::with_probability(0.25), Arc::new(FailingNarrator));

    let plan = engine
        .coach(&CoachRequest {
            adjusted: struggling_metrics(),
            final_score: Some(41),
        })
        .await
        .expect("fallback plan");

    assert_eq!(plan.projected_score, 41);
    assert_eq!(plan.standing, Standing::ActionRequired);
    assert_eq!(plan.action_steps.len(), 3);
    assert!(plan.action_steps[0].contains("stock"));
    assert_eq!(plan.growth_tips.len(), 3);
}
