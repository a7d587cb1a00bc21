use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use crate::health::model::{Attributor, DistressPredictor, ImportanceVector, ModelError};
use crate::health::narration::{
    ActionPlan, NarrationError, NarrationRequest, Narrator, PlanRequest,
};
use crate::health::scoring::{EngineeredFeatures, Feature};
use crate::health::{health_router, BusinessMetrics, HealthEngine, SliderMap};

/// Rule breakdown sums to exactly 100 for these inputs.
pub(super) fn healthy_metrics() -> BusinessMetrics {
    BusinessMetrics {
        inventory_days: 20.0,
        monthly_cash_surplus: 5_000.0,
        monthly_wages: 3_000.0,
        monthly_loan_payment: 1_000.0,
        total_assets: 100_000.0,
        total_debt: 20_000.0,
        sector: Some("retail".to_string()),
        currency: Some("KES".to_string()),
    }
}

/// Every rule category scores low.
pub(super) fn struggling_metrics() -> BusinessMetrics {
    BusinessMetrics {
        inventory_days: 120.0,
        monthly_cash_surplus: 500.0,
        monthly_wages: 3_000.0,
        monthly_loan_payment: 1_000.0,
        total_assets: 10_000.0,
        total_debt: 12_000.0,
        sector: Some("hardware".to_string()),
        currency: None,
    }
}

/// Importance concentrated on stock days, with a smaller pull from the
/// current ratio (which fans out to assets and debt).
pub(super) fn stock_heavy_importances() -> ImportanceVector {
    let mut values = [0.0; Feature::COUNT];
    values[Feature::InventoryTurnoverDays.index()] = 1.0;
    values[Feature::CurrentRatio.index()] = -0.2;
    ImportanceVector::from_values(values)
}

/// Fixed distress probability and importances, whatever the features.
pub(super) struct StubModel {
    pub(super) probability: f64,
    pub(super) importances: ImportanceVector,
}

impl StubModel {
    pub(super) fn with_probability(probability: f64) -> Self {
        Self {
            probability,
            importances: stock_heavy_importances(),
        }
    }
}

impl DistressPredictor for StubModel {
    fn predict(&self, _features: &EngineeredFeatures) -> Result<f64, ModelError> {
        Ok(self.probability)
    }
}

impl Attributor for StubModel {
    fn attribute(&self, _features: &EngineeredFeatures) -> Result<ImportanceVector, ModelError> {
        Ok(self.importances)
    }
}

pub(super) struct FailingModel;

impl DistressPredictor for FailingModel {
    fn predict(&self, _features: &EngineeredFeatures) -> Result<f64, ModelError> {
        Err(ModelError::ShapeMismatch {
            expected: Feature::COUNT,
            found: 9,
        })
    }
}

impl Attributor for FailingModel {
    fn attribute(&self, _features: &EngineeredFeatures) -> Result<ImportanceVector, ModelError> {
        Ok(ImportanceVector::zeros())
    }
}

/// Records every request and answers with canned text.
pub(super) struct StubNarrator {
    pub(super) text: String,
    pub(super) plan: ActionPlan,
    explained: Mutex<Vec<NarrationRequest>>,
    planned: Mutex<Vec<PlanRequest>>,
}

impl StubNarrator {
    pub(super) fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            plan: ActionPlan {
                action_steps: vec!["Collect payments within two weeks.".to_string()],
                growth_tips: vec!["Open a second sales channel.".to_string()],
            },
            explained: Mutex::new(Vec::new()),
            planned: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn explained(&self) -> Vec<NarrationRequest> {
        self.explained.lock().expect("lock").clone()
    }

    pub(super) fn planned(&self) -> Vec<PlanRequest> {
        self.planned.lock().expect("lock").clone()
    }
}

impl Default for StubNarrator {
    fn default() -> Self {
        Self::new("Your business is in great shape.")
    }
}

impl Narrator for StubNarrator {
    async fn explain(&self, request: &NarrationRequest) -> Result<String, NarrationError> {
        self.explained.lock().expect("lock").push(request.clone());
        Ok(self.text.clone())
    }

    async fn action_plan(&self, request: &PlanRequest) -> Result<ActionPlan, NarrationError> {
        self.planned.lock().expect("lock").push(request.clone());
        Ok(self.plan.clone())
    }
}

pub(super) struct FailingNarrator;

impl Narrator for FailingNarrator {
    async fn explain(&self, _request: &NarrationRequest) -> Result<String, NarrationError> {
        Err(NarrationError::Status(503))
    }

    async fn action_plan(&self, _request: &PlanRequest) -> Result<ActionPlan, NarrationError> {
        Err(NarrationError::EmptyResponse)
    }
}

pub(super) fn engine_with<M, N>(model: M, narrator: Arc<N>) -> HealthEngine<M, N>
where
    M: crate::health::DistressModel + 'static,
    N: Narrator + 'static,
{
    HealthEngine::new(Arc::new(model), narrator, SliderMap::standard())
}

pub(super) fn stub_engine() -> (HealthEngine<StubModel, StubNarrator>, Arc<StubNarrator>) {
    let narrator = Arc::new(StubNarrator::default());
    let engine = engine_with(StubModel::with_probability(0.25), narrator.clone());
    (engine, narrator)
}

pub(super) fn router_for<M, N>(engine: HealthEngine<M, N>) -> axum::Router
where
    M: crate::health::DistressModel + 'static,
    N: Narrator + 'static,
{
    health_router(Arc::new(engine))
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json")
}
