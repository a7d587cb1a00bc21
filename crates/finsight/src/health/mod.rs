//! Financial-health scoring: rule sub-scores blended with a distress
//! classifier, model importances projected onto user-facing sliders, and
//! what-if simulation over the same pipeline.

pub mod attribution;
pub mod domain;
pub mod import;
pub mod model;
pub mod narration;
pub mod router;
pub mod scoring;
pub mod service;
pub mod simulation;

#[cfg(test)]
mod tests;

pub use attribution::{build_impacts, MappingError, SliderMap};
pub use domain::{
    BusinessMetrics, ImpactTier, ResultStatus, ScoreBreakdown, ScoreCategory, SliderImpact,
    SliderKey, SliderStatus, SubScore,
};
pub use import::{MetricsImportError, MetricsImporter};
pub use model::{
    Attributor, DistressModel, DistressPredictor, ImportanceVector, LogisticModel, ModelError,
};
pub use narration::{ActionPlan, ChatNarrator, NarrationError, NarrationRequest, Narrator};
pub use router::health_router;
pub use service::{
    AdjustedEcho, Assessment, CoachPlan, CoachRequest, DiagnosisReport, EngineError,
    HealthEngine, SimulationOutcome, SimulationRequest, Standing,
};
pub use simulation::{apply_deltas, SliderDeltas};
