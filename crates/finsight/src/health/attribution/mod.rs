//! Projects model importances onto user-facing sliders and flags which
//! sliders are already at their best.

mod impact;
mod mapping;
mod optimality;

pub use impact::{classify_tier, slider_shares, SliderShares, HIGH_SHARE, MEDIUM_SHARE};
pub use mapping::{MappingError, SliderMap};
pub use optimality::slider_status;

use super::domain::{BusinessMetrics, ScoreBreakdown, SliderImpact, SliderKey};
use super::model::ImportanceVector;

/// One entry per slider, in canonical order, then stably grouped by tier
/// (high first).
pub fn build_impacts(
    metrics: &BusinessMetrics,
    breakdown: &ScoreBreakdown,
    importances: &ImportanceVector,
    map: &SliderMap,
) -> Vec<SliderImpact> {
    let shares = slider_shares(importances, map);

    let mut impacts: Vec<SliderImpact> = SliderKey::ALL
        .into_iter()
        .map(|key| {
            let impact_share = shares.get(key);
            SliderImpact {
                key,
                label: key.label().to_string(),
                current_value: metrics.slider(key),
                impact_share,
                tier: classify_tier(impact_share),
                status: slider_status(key, metrics, breakdown),
            }
        })
        .collect();

    impacts.sort_by_key(|impact| impact.tier);
    impacts
}

#[cfg(test)]
mod tests {
    use super::super::scoring::{calculate_score_breakdown, Feature};
    use super::*;
    use crate::health::domain::ImpactTier;

    #[test]
    fn impacts_cover_every_slider_high_tier_first() {
        let metrics = BusinessMetrics {
            inventory_days: 75.0,
            monthly_cash_surplus: 2_000.0,
            monthly_wages: 3_000.0,
            monthly_loan_payment: 1_500.0,
            total_assets: 40_000.0,
            total_debt: 30_000.0,
            sector: None,
            currency: None,
        };
        let mut values = [0.0; Feature::COUNT];
        values[Feature::InventoryTurnoverDays.index()] = 0.9;
        values[Feature::ReturnOnSales.index()] = 0.1;
        let impacts = build_impacts(
            &metrics,
            &calculate_score_breakdown(&metrics),
            &ImportanceVector::from_values(values),
            &SliderMap::standard(),
        );

        assert_eq!(impacts.len(), SliderKey::COUNT);
        assert_eq!(impacts[0].key, SliderKey::InventoryDays);
        assert_eq!(impacts[0].tier, ImpactTier::High);
        assert_eq!(impacts[0].current_value, 75.0);
        assert!(impacts
            .windows(2)
            .all(|pair| pair[0].tier <= pair[1].tier));
        let total: f64 = impacts.iter().map(|impact| impact.impact_share).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
