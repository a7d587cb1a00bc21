//! Deterministic half of the pipeline: ratios for the model, the rule table,
//! and the blend of the two.

mod blend;
mod features;
mod rules;

pub use blend::{blend_score, MODEL_WEIGHT, RULE_WEIGHT};
pub use features::{engineer_features, EngineeredFeatures, Feature};
pub use rules::{calculate_score_breakdown, RuleSignals};
