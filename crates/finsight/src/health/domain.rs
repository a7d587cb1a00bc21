use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Raw accounting inputs supplied by the business owner.
///
/// Values are never mutated; simulation derives a fresh copy through
/// [`BusinessMetrics::with_slider`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessMetrics {
    pub inventory_days: f64,
    pub monthly_cash_surplus: f64,
    pub monthly_wages: f64,
    pub monthly_loan_payment: f64,
    pub total_assets: f64,
    pub total_debt: f64,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl BusinessMetrics {
    pub fn slider(&self, key: SliderKey) -> f64 {
        match key {
            SliderKey::InventoryDays => self.inventory_days,
            SliderKey::MonthlyCashSurplus => self.monthly_cash_surplus,
            SliderKey::MonthlyWages => self.monthly_wages,
            SliderKey::MonthlyLoanPayment => self.monthly_loan_payment,
            SliderKey::TotalAssets => self.total_assets,
            SliderKey::TotalDebt => self.total_debt,
        }
    }

    pub fn with_slider(&self, key: SliderKey, value: f64) -> Self {
        let mut next = self.clone();
        let field = match key {
            SliderKey::InventoryDays => &mut next.inventory_days,
            SliderKey::MonthlyCashSurplus => &mut next.monthly_cash_surplus,
            SliderKey::MonthlyWages => &mut next.monthly_wages,
            SliderKey::MonthlyLoanPayment => &mut next.monthly_loan_payment,
            SliderKey::TotalAssets => &mut next.total_assets,
            SliderKey::TotalDebt => &mut next.total_debt,
        };
        *field = value;
        next
    }

    pub fn sector_label(&self) -> &str {
        self.sector.as_deref().unwrap_or("general")
    }

    pub fn currency_label(&self) -> &str {
        self.currency.as_deref().unwrap_or("USD")
    }
}

/// User-facing control. One per numeric field of [`BusinessMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliderKey {
    InventoryDays,
    MonthlyCashSurplus,
    MonthlyWages,
    MonthlyLoanPayment,
    TotalAssets,
    TotalDebt,
}

impl SliderKey {
    pub const COUNT: usize = 6;

    pub const ALL: [SliderKey; SliderKey::COUNT] = [
        SliderKey::InventoryDays,
        SliderKey::MonthlyCashSurplus,
        SliderKey::MonthlyWages,
        SliderKey::MonthlyLoanPayment,
        SliderKey::TotalAssets,
        SliderKey::TotalDebt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SliderKey::InventoryDays => "inventory_days",
            SliderKey::MonthlyCashSurplus => "monthly_cash_surplus",
            SliderKey::MonthlyWages => "monthly_wages",
            SliderKey::MonthlyLoanPayment => "monthly_loan_payment",
            SliderKey::TotalAssets => "total_assets",
            SliderKey::TotalDebt => "total_debt",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SliderKey::InventoryDays => "Inventory Days",
            SliderKey::MonthlyCashSurplus => "Monthly Cash Surplus",
            SliderKey::MonthlyWages => "Monthly Wages",
            SliderKey::MonthlyLoanPayment => "Monthly Loan Payment",
            SliderKey::TotalAssets => "Total Assets",
            SliderKey::TotalDebt => "Total Debt",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for SliderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SliderKey {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        SliderKey::ALL
            .into_iter()
            .find(|key| key.as_str() == raw.trim())
            .ok_or_else(|| format!("unknown slider '{raw}'"))
    }
}

/// The four rule-based scoring categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    CashPosition,
    ProfitMargin,
    AssetVsDebt,
    DebtCoverage,
}

impl ScoreCategory {
    /// Points available in this category.
    pub fn cap(&self) -> u8 {
        match self {
            ScoreCategory::CashPosition => 25,
            ScoreCategory::ProfitMargin => 30,
            ScoreCategory::AssetVsDebt => 25,
            ScoreCategory::DebtCoverage => 20,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreCategory::CashPosition => "Cash Position",
            ScoreCategory::ProfitMargin => "Profit Margin",
            ScoreCategory::AssetVsDebt => "Assets vs Debt",
            ScoreCategory::DebtCoverage => "Debt Coverage",
        }
    }
}

/// One capped category result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScore {
    pub current: u8,
    pub max: u8,
    pub label: String,
}

impl SubScore {
    pub(crate) fn new(category: ScoreCategory, current: u8) -> Self {
        Self {
            current: current.min(category.cap()),
            max: category.cap(),
            label: category.label().to_string(),
        }
    }

    pub fn is_maxed(&self) -> bool {
        self.current == self.max
    }
}

/// Rule-based sub-scores keyed by category; serialises as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub cash_position: SubScore,
    pub profit_margin: SubScore,
    pub asset_vs_debt: SubScore,
    pub debt_coverage: SubScore,
}

impl ScoreBreakdown {
    pub fn get(&self, category: ScoreCategory) -> &SubScore {
        match category {
            ScoreCategory::CashPosition => &self.cash_position,
            ScoreCategory::ProfitMargin => &self.profit_margin,
            ScoreCategory::AssetVsDebt => &self.asset_vs_debt,
            ScoreCategory::DebtCoverage => &self.debt_coverage,
        }
    }

    pub fn entries(&self) -> [(ScoreCategory, &SubScore); 4] {
        [
            (ScoreCategory::CashPosition, &self.cash_position),
            (ScoreCategory::ProfitMargin, &self.profit_margin),
            (ScoreCategory::AssetVsDebt, &self.asset_vs_debt),
            (ScoreCategory::DebtCoverage, &self.debt_coverage),
        ]
    }

    /// Sum of the four sub-scores (the "hand score").
    pub fn total(&self) -> u8 {
        self.entries()
            .iter()
            .map(|(_, score)| score.current)
            .sum()
    }
}

/// Coarse bucket for a slider's share of total importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactTier {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliderStatus {
    Optimal,
    NeedsImprovement,
}

/// Explanation entry for one slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderImpact {
    pub key: SliderKey,
    pub label: String,
    pub current_value: f64,
    pub impact_share: f64,
    pub tier: ImpactTier,
    pub status: SliderStatus,
}

/// Marker serialised as `"status": "success"` on complete results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    #[default]
    Success,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_keys_round_trip_through_their_names() {
        for key in SliderKey::ALL {
            assert_eq!(key.as_str().parse::<SliderKey>(), Ok(key));
        }
        assert!("revenue".parse::<SliderKey>().is_err());
    }

    #[test]
    fn category_caps_sum_to_one_hundred() {
        let total: u32 = [
            ScoreCategory::CashPosition,
            ScoreCategory::ProfitMargin,
            ScoreCategory::AssetVsDebt,
            ScoreCategory::DebtCoverage,
        ]
        .iter()
        .map(|category| u32::from(category.cap()))
        .sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn sub_scores_are_capped_per_category() {
        let capped = SubScore::new(ScoreCategory::DebtCoverage, 35);
        assert_eq!(capped.current, 20);
        assert_eq!(capped.max, 20);
        assert!(capped.is_maxed());

        let partial = SubScore::new(ScoreCategory::ProfitMargin, 12);
        assert_eq!(partial.current, 12);
        assert_eq!(partial.max, 30);
        assert_eq!(partial.label, "Profit Margin");
    }

    #[test]
    fn with_slider_leaves_original_untouched() {
        let metrics = BusinessMetrics {
            inventory_days: 45.0,
            monthly_cash_surplus: 1_000.0,
            monthly_wages: 2_000.0,
            monthly_loan_payment: 500.0,
            total_assets: 50_000.0,
            total_debt: 10_000.0,
            sector: Some("retail".to_string()),
            currency: None,
        };
        let adjusted = metrics.with_slider(SliderKey::TotalDebt, 0.0);
        assert_eq!(metrics.total_debt, 10_000.0);
        assert_eq!(adjusted.total_debt, 0.0);
        assert_eq!(adjusted.sector, metrics.sector);
        assert_eq!(adjusted.currency_label(), "USD");
    }
}
