//! Boundary to the distress classifier and its attribution mechanism.
//!
//! The engine only depends on [`DistressPredictor`] and [`Attributor`]. The
//! bundled [`LogisticModel`] implements both: a logistic regression whose
//! attributions are exact linear SHAP values in logit space.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::scoring::{EngineeredFeatures, Feature};

const BUNDLED_MODEL: &str = include_str!("../../models/distress_model.json");

/// Signed per-feature importance, aligned with [`Feature::ALL`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportanceVector {
    values: [f64; Feature::COUNT],
}

impl ImportanceVector {
    pub fn from_values(values: [f64; Feature::COUNT]) -> Self {
        Self { values }
    }

    pub fn zeros() -> Self {
        Self {
            values: [0.0; Feature::COUNT],
        }
    }

    /// Sign is irrelevant to slider attribution; only magnitude is used.
    pub fn magnitude(&self, feature: Feature) -> f64 {
        self.values[feature.index()].abs()
    }

    pub fn signed(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }
}

/// Returns the probability of financial distress in `[0, 1]`.
pub trait DistressPredictor: Send + Sync {
    fn predict(&self, features: &EngineeredFeatures) -> Result<f64, ModelError>;
}

/// Returns one importance value per engineered feature.
pub trait Attributor: Send + Sync {
    fn attribute(&self, features: &EngineeredFeatures) -> Result<ImportanceVector, ModelError>;
}

/// Anything that can both predict and explain.
pub trait DistressModel: DistressPredictor + Attributor {}

impl<T> DistressModel for T where T: DistressPredictor + Attributor {}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model expects {expected} features but was given {found}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("model feature '{0}' is not an engineered feature")]
    UnknownFeature(String),
    #[error("model feature at position {position} is '{found}', expected '{expected}'")]
    FeatureOrder {
        position: usize,
        expected: Feature,
        found: String,
    },
    #[error("feature {feature} or its attribution is not a finite number")]
    NonFinite { feature: Feature },
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid model definition: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Serialised form of a [`LogisticModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    pub name: String,
    pub intercept: f64,
    pub features: Vec<FeatureWeight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub name: String,
    pub coefficient: f64,
    /// Training-set mean, the reference point for attributions.
    pub baseline: f64,
}

/// Logistic distress classifier over the ten engineered ratios.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    name: String,
    intercept: f64,
    coefficients: [f64; Feature::COUNT],
    baselines: [f64; Feature::COUNT],
}

impl LogisticModel {
    pub fn bundled() -> Result<Self, ModelError> {
        Self::from_json(BUNDLED_MODEL)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let definition: ModelDefinition = serde_json::from_str(raw)?;
        Self::from_definition(definition)
    }

    /// Validates that the definition was trained on exactly the engineered
    /// features, in their canonical order.
    pub fn from_definition(definition: ModelDefinition) -> Result<Self, ModelError> {
        if definition.features.len() != Feature::COUNT {
            return Err(ModelError::ShapeMismatch {
                expected: Feature::COUNT,
                found: definition.features.len(),
            });
        }

        let mut coefficients = [0.0; Feature::COUNT];
        let mut baselines = [0.0; Feature::COUNT];
        for (position, (expected, weight)) in
            Feature::ALL.iter().zip(definition.features.iter()).enumerate()
        {
            let found: Feature = weight.name.parse().map_err(ModelError::UnknownFeature)?;
            if found != *expected {
                return Err(ModelError::FeatureOrder {
                    position,
                    expected: *expected,
                    found: weight.name.clone(),
                });
            }
            coefficients[position] = weight.coefficient;
            baselines[position] = weight.baseline;
        }

        Ok(Self {
            name: definition.name,
            intercept: definition.intercept,
            coefficients,
            baselines,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn checked(&self, features: &EngineeredFeatures) -> Result<(), ModelError> {
        match features.iter().find(|(_, value)| !value.is_finite()) {
            Some((feature, _)) => Err(ModelError::NonFinite { feature }),
            None => Ok(()),
        }
    }

    fn logit(&self, features: &EngineeredFeatures) -> f64 {
        self.coefficients
            .iter()
            .zip(features.values())
            .fold(self.intercept, |acc, (weight, value)| acc + weight * value)
    }
}

impl DistressPredictor for LogisticModel {
    fn predict(&self, features: &EngineeredFeatures) -> Result<f64, ModelError> {
        self.checked(features)?;
        Ok(sigmoid(self.logit(features)))
    }
}

impl Attributor for LogisticModel {
    fn attribute(&self, features: &EngineeredFeatures) -> Result<ImportanceVector, ModelError> {
        self.checked(features)?;
        let mut values = [0.0; Feature::COUNT];
        for (index, feature) in Feature::ALL.into_iter().enumerate() {
            let value = features.values()[index];
            let attribution = self.coefficients[index] * (value - self.baselines[index]);
            if !attribution.is_finite() {
                return Err(ModelError::NonFinite { feature });
            }
            values[index] = attribution;
        }
        Ok(ImportanceVector { values })
    }
}

fn sigmoid(logit: f64) -> f64 {
    1.0 / (1.0 + (-logit).exp())
}
