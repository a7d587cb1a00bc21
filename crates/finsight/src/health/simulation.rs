use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{BusinessMetrics, SliderKey};

/// Percentage adjustments per slider; `-15.0` means "15% less".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SliderDeltas {
    deltas: BTreeMap<SliderKey, f64>,
}

impl SliderDeltas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: SliderKey, percent: f64) -> Self {
        self.deltas.insert(key, percent);
        self
    }

    /// Keeps the keys that name a slider; anything else is dropped.
    pub fn from_raw(raw: &BTreeMap<String, f64>) -> Self {
        let mut deltas = BTreeMap::new();
        for (name, percent) in raw {
            match name.parse::<SliderKey>() {
                Ok(key) => {
                    deltas.insert(key, *percent);
                }
                Err(_) => debug!(adjustment = %name, "ignoring unknown slider adjustment"),
            }
        }
        Self { deltas }
    }

    pub fn get(&self, key: SliderKey) -> Option<f64> {
        self.deltas.get(&key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// True when at least one slider actually moves.
    pub fn has_effect(&self) -> bool {
        self.deltas.values().any(|percent| *percent != 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SliderKey, f64)> + '_ {
        self.deltas.iter().map(|(key, percent)| (*key, *percent))
    }
}

impl<'de> Deserialize<'de> for SliderDeltas {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        Ok(Self::from_raw(&raw))
    }
}

/// Returns a new metrics value with each listed slider scaled by
/// `1 + percent / 100` and floored at zero. Unlisted sliders are unchanged.
pub fn apply_deltas(metrics: &BusinessMetrics, deltas: &SliderDeltas) -> BusinessMetrics {
    deltas
        .iter()
        .fold(metrics.clone(), |adjusted, (key, percent)| {
            let scaled = (metrics.slider(key) * (1.0 + percent / 100.0)).max(0.0);
            adjusted.with_slider(key, scaled)
        })
}
