use super::super::domain::{ImpactTier, SliderKey};
use super::super::model::ImportanceVector;
use super::super::scoring::Feature;
use super::mapping::SliderMap;
use tracing::warn;

/// Share above which a slider is a high-impact lever.
pub const HIGH_SHARE: f64 = 0.3;
/// Share above which a slider is a medium-impact lever.
pub const MEDIUM_SHARE: f64 = 0.1;

/// Normalised share of total importance per slider, indexed by [`SliderKey::ALL`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderShares {
    shares: [f64; SliderKey::COUNT],
}

impl SliderShares {
    pub fn get(&self, key: SliderKey) -> f64 {
        self.shares[key.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (SliderKey, f64)> + '_ {
        SliderKey::ALL.into_iter().zip(self.shares.iter().copied())
    }

    pub fn total(&self) -> f64 {
        self.shares.iter().sum()
    }
}

/// Adds each feature's magnitude to every slider it maps to (fan-out, not
/// split), then divides by the grand total. With no importance at all the
/// divisor becomes 1 and every share is 0.
///
/// Non-finite magnitudes are dropped. Magnitudes are rescaled by the largest
/// one before accumulating so the totals cannot overflow.
pub fn slider_shares(importances: &ImportanceVector, map: &SliderMap) -> SliderShares {
    let magnitudes = Feature::ALL.map(|feature| {
        let magnitude = importances.magnitude(feature);
        if magnitude.is_finite() {
            magnitude
        } else {
            warn!(feature = %feature, "ignoring non-finite importance");
            0.0
        }
    });
    let peak = magnitudes.iter().copied().fold(0.0, f64::max);
    let scale = if peak > 0.0 { peak } else { 1.0 };

    let mut totals = [0.0; SliderKey::COUNT];
    for (feature, magnitude) in Feature::ALL.into_iter().zip(magnitudes) {
        for slider in map.sliders_for(feature) {
            totals[slider.index()] += magnitude / scale;
        }
    }

    let sum: f64 = totals.iter().sum();
    let divisor = if sum == 0.0 { 1.0 } else { sum };
    for total in &mut totals {
        *total /= divisor;
    }

    SliderShares { shares: totals }
}

pub fn classify_tier(share: f64) -> ImpactTier {
    if share > HIGH_SHARE {
        ImpactTier::High
    } else if share > MEDIUM_SHARE {
        ImpactTier::Medium
    } else {
        ImpactTier::Low
    }
}
