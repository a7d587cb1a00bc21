use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::attribution::{build_impacts, SliderMap};
use super::domain::{BusinessMetrics, ResultStatus, ScoreBreakdown, SliderImpact, SliderKey};
use super::model::{DistressModel, ModelError};
use super::narration::{
    parse_benefits, ActionPlan, NarrationMode, NarrationRequest, Narrator, PlanRequest,
    FALLBACK_BENEFITS, FALLBACK_EXPLANATION, STEADY_STATE_BENEFIT,
};
use super::scoring::{blend_score, calculate_score_breakdown, engineer_features, EngineeredFeatures};
use super::simulation::{apply_deltas, SliderDeltas};

/// Score at or above which a business is reported as stable.
pub const STABLE_SCORE: u8 = 70;

/// Narration-free pipeline result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub features: EngineeredFeatures,
    pub breakdown: ScoreBreakdown,
    pub hand_score: u8,
    pub distress_probability: f64,
    pub health_score: u8,
    pub impacts: Vec<SliderImpact>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisReport {
    pub status: ResultStatus,
    pub health_score: u8,
    pub breakdown: ScoreBreakdown,
    pub impacts: Vec<SliderImpact>,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationRequest {
    pub original: BusinessMetrics,
    #[serde(default)]
    pub adjustments: SliderDeltas,
    /// Score the caller is comparing against, usually from a prior diagnosis.
    #[serde(default)]
    pub current_score: Option<u8>,
}

/// The six adjusted slider values plus the pass-through labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustedEcho {
    pub inventory_days: f64,
    pub monthly_cash_surplus: f64,
    pub monthly_wages: f64,
    pub monthly_loan_payment: f64,
    pub total_assets: f64,
    pub total_debt: f64,
    pub sector: Option<String>,
    pub currency: Option<String>,
}

impl From<&BusinessMetrics> for AdjustedEcho {
    fn from(metrics: &BusinessMetrics) -> Self {
        Self {
            inventory_days: metrics.slider(SliderKey::InventoryDays),
            monthly_cash_surplus: metrics.slider(SliderKey::MonthlyCashSurplus),
            monthly_wages: metrics.slider(SliderKey::MonthlyWages),
            monthly_loan_payment: metrics.slider(SliderKey::MonthlyLoanPayment),
            total_assets: metrics.slider(SliderKey::TotalAssets),
            total_debt: metrics.slider(SliderKey::TotalDebt),
            sector: metrics.sector.clone(),
            currency: metrics.currency.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub status: ResultStatus,
    pub final_score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_change: Option<i16>,
    pub potential_benefits: Vec<String>,
    pub adjusted: AdjustedEcho,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoachRequest {
    /// Simulated state the plan should move the business towards.
    pub adjusted: BusinessMetrics,
    /// Recomputed from `adjusted` when absent.
    #[serde(default)]
    pub final_score: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Stable,
    ActionRequired,
}

impl Standing {
    pub fn from_score(score: u8) -> Self {
        if score >= STABLE_SCORE {
            Standing::Stable
        } else {
            Standing::ActionRequired
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoachPlan {
    pub status: ResultStatus,
    pub projected_score: u8,
    pub standing: Standing,
    pub action_steps: Vec<String>,
    pub growth_tips: Vec<String>,
}

/// Only predictor and attributor failures surface; narration always degrades.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("distress model failed: {0}")]
    Model(#[from] ModelError),
}

/// Scoring pipeline with its read-only collaborators injected once at startup.
pub struct HealthEngine<M, N> {
    model: Arc<M>,
    narrator: Arc<N>,
    slider_map: Arc<SliderMap>,
}

impl<M, N> HealthEngine<M, N>
where
    M: DistressModel + 'static,
    N: Narrator + 'static,
{
    pub fn new(model: Arc<M>, narrator: Arc<N>, slider_map: SliderMap) -> Self {
        Self {
            model,
            narrator,
            slider_map: Arc::new(slider_map),
        }
    }

    /// Features, rule breakdown, probability, attribution, blend and impacts.
    pub fn assess(&self, metrics: &BusinessMetrics) -> Result<Assessment, EngineError> {
        let features = engineer_features(metrics);
        let breakdown = calculate_score_breakdown(metrics);
        let hand_score = breakdown.total();

        let distress_probability = self.model.predict(&features)?;
        let importances = self.model.attribute(&features)?;

        let health_score = blend_score(hand_score, distress_probability);
        let impacts = build_impacts(metrics, &breakdown, &importances, &self.slider_map);

        debug!(hand_score, distress_probability, health_score, "assessed business metrics");

        Ok(Assessment {
            features,
            breakdown,
            hand_score,
            distress_probability,
            health_score,
            impacts,
        })
    }

    pub async fn diagnose(
        &self,
        metrics: &BusinessMetrics,
    ) -> Result<DiagnosisReport, EngineError> {
        let assessment = self.assess(metrics)?;

        let request = NarrationRequest {
            health_score: assessment.health_score,
            breakdown: assessment.breakdown.clone(),
            impacts: assessment.impacts.clone(),
            sector: metrics.sector_label().to_string(),
            currency: metrics.currency_label().to_string(),
            mode: NarrationMode::Diagnosis,
        };
        let explanation = match self.narrator.explain(&request).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "explanation unavailable, using fallback");
                FALLBACK_EXPLANATION.to_string()
            }
        };

        info!(
            health_score = assessment.health_score,
            sector = metrics.sector_label(),
            "diagnosis complete"
        );

        Ok(DiagnosisReport {
            status: ResultStatus::Success,
            health_score: assessment.health_score,
            breakdown: assessment.breakdown,
            impacts: assessment.impacts,
            explanation,
        })
    }

    /// Re-runs the full pipeline on the adjusted metrics.
    pub async fn simulate(
        &self,
        request: &SimulationRequest,
    ) -> Result<SimulationOutcome, EngineError> {
        let adjusted = apply_deltas(&request.original, &request.adjustments);
        let assessment = self.assess(&adjusted)?;

        let potential_benefits = if request.adjustments.has_effect() {
            self.benefits(&adjusted, &assessment, request).await
        } else {
            vec![STEADY_STATE_BENEFIT.to_string()]
        };

        let final_score = assessment.health_score;
        let points_change = request
            .current_score
            .map(|previous| i16::from(final_score) - i16::from(previous));

        info!(
            final_score,
            previous_score = ?request.current_score,
            adjustments = request.adjustments.iter().count(),
            "simulation complete"
        );

        Ok(SimulationOutcome {
            status: ResultStatus::Success,
            final_score,
            previous_score: request.current_score,
            points_change,
            potential_benefits,
            adjusted: AdjustedEcho::from(&adjusted),
        })
    }

    async fn benefits(
        &self,
        adjusted: &BusinessMetrics,
        assessment: &Assessment,
        request: &SimulationRequest,
    ) -> Vec<String> {
        let narration = NarrationRequest {
            health_score: assessment.health_score,
            breakdown: assessment.breakdown.clone(),
            impacts: assessment.impacts.clone(),
            sector: adjusted.sector_label().to_string(),
            currency: adjusted.currency_label().to_string(),
            mode: NarrationMode::Simulation {
                previous_score: request.current_score,
                adjustments: request.adjustments.clone(),
            },
        };

        let parsed = match self.narrator.explain(&narration).await {
            Ok(text) => parse_benefits(&text),
            Err(err) => {
                warn!(error = %err, "benefits unavailable, using fallback");
                Vec::new()
            }
        };

        if parsed.is_empty() {
            vec![FALLBACK_BENEFITS.to_string()]
        } else {
            parsed
        }
    }

    /// Builds a short action plan for a simulated target state.
    pub async fn coach(&self, request: &CoachRequest) -> Result<CoachPlan, EngineError> {
        let assessment = self.assess(&request.adjusted)?;
        let projected_score = request.final_score.unwrap_or(assessment.health_score);

        let plan_request = PlanRequest {
            score: projected_score,
            metrics: request.adjusted.clone(),
            impacts: assessment.impacts,
        };
        let plan = match self.narrator.action_plan(&plan_request).await {
            Ok(plan) if !plan.action_steps.is_empty() => plan,
            Ok(_) => {
                warn!("action plan came back empty, using fallback");
                ActionPlan::fallback(&plan_request.impacts)
            }
            Err(err) => {
                warn!(error = %err, "action plan unavailable, using fallback");
                ActionPlan::fallback(&plan_request.impacts)
            }
        };

        Ok(CoachPlan {
            status: ResultStatus::Success,
            projected_score,
            standing: Standing::from_score(projected_score),
            action_steps: plan.action_steps,
            growth_tips: plan.growth_tips,
        })
    }
}
