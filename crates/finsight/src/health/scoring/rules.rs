use super::super::domain::{BusinessMetrics, ScoreBreakdown, ScoreCategory, SubScore};

/// Ratios the rule table is evaluated against, kept for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleSignals {
    pub debt_ratio: f64,
    pub dscr: f64,
    pub payroll_coverage: f64,
    pub inventory_days: f64,
}

impl RuleSignals {
    pub fn from_metrics(metrics: &BusinessMetrics) -> Self {
        Self {
            debt_ratio: metrics.total_debt / metrics.total_assets.max(1.0),
            dscr: metrics.monthly_cash_surplus / metrics.monthly_loan_payment.max(1.0),
            payroll_coverage: metrics.monthly_cash_surplus / metrics.monthly_wages.max(1.0),
            inventory_days: metrics.inventory_days,
        }
    }
}

/// Scores the four categories independently. Pure; the total never exceeds 100.
pub fn calculate_score_breakdown(metrics: &BusinessMetrics) -> ScoreBreakdown {
    let signals = RuleSignals::from_metrics(metrics);

    ScoreBreakdown {
        cash_position: SubScore::new(
            ScoreCategory::CashPosition,
            cash_points(signals.payroll_coverage),
        ),
        profit_margin: SubScore::new(
            ScoreCategory::ProfitMargin,
            stock_points(signals.inventory_days),
        ),
        asset_vs_debt: SubScore::new(
            ScoreCategory::AssetVsDebt,
            leverage_points(signals.debt_ratio),
        ),
        debt_coverage: SubScore::new(ScoreCategory::DebtCoverage, coverage_points(signals.dscr)),
    }
}

fn leverage_points(debt_ratio: f64) -> u8 {
    if debt_ratio < 0.4 {
        25
    } else if debt_ratio < 0.8 {
        15
    } else if debt_ratio <= 1.0 {
        5
    } else {
        0
    }
}

fn coverage_points(dscr: f64) -> u8 {
    if dscr >= 1.5 {
        20
    } else if dscr >= 1.2 {
        15
    } else if dscr >= 1.0 {
        10
    } else {
        0
    }
}

fn cash_points(payroll_coverage: f64) -> u8 {
    if payroll_coverage >= 1.0 {
        25
    } else if payroll_coverage >= 0.5 {
        15
    } else {
        5
    }
}

fn stock_points(inventory_days: f64) -> u8 {
    if inventory_days <= 30.0 {
        30
    } else if inventory_days <= 60.0 {
        20
    } else if inventory_days <= 90.0 {
        10
    } else {
        0
    }
}
