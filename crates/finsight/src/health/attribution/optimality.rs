use super::super::domain::{BusinessMetrics, ScoreBreakdown, SliderKey, SliderStatus};

/// Stock turnaround at or below this many days is already as good as it gets.
const OPTIMAL_INVENTORY_DAYS: f64 = 30.0;

/// A slider is optimal when the rule category it drives is already capped.
pub fn slider_status(
    key: SliderKey,
    metrics: &BusinessMetrics,
    breakdown: &ScoreBreakdown,
) -> SliderStatus {
    let optimal = match key {
        SliderKey::InventoryDays => metrics.inventory_days <= OPTIMAL_INVENTORY_DAYS,
        SliderKey::TotalDebt | SliderKey::TotalAssets => breakdown.asset_vs_debt.is_maxed(),
        SliderKey::MonthlyCashSurplus | SliderKey::MonthlyWages => {
            breakdown.cash_position.is_maxed()
        }
        SliderKey::MonthlyLoanPayment => breakdown.debt_coverage.is_maxed(),
    };

    if optimal {
        SliderStatus::Optimal
    } else {
        SliderStatus::NeedsImprovement
    }
}
