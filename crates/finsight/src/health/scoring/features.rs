use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::super::domain::BusinessMetrics;

/// Days per year used by the turnover ratios.
const DAYS_PER_YEAR: f64 = 365.0;
/// Receivables are not collected from users; the model sees a fixed value.
const ASSUMED_RECEIVABLE_DAYS: f64 = 15.0;
/// Share of total debt treated as current liabilities.
const CURRENT_DEBT_SHARE: f64 = 0.3;
/// Share of total assets treated as current assets.
const CURRENT_ASSET_SHARE: f64 = 0.4;

/// Ratios fed to the distress model, in the order the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    ReturnOnSales,
    ActivityTotalAssetTurnover,
    AssetTurnoverDays,
    DaysTotalReceivablesOutstanding,
    InventoryTurnoverDays,
    LiquidityCashRatio,
    QuickRatio,
    CurrentRatio,
    ReturnOnAssets,
    ReturnOnEquity,
}

impl Feature {
    pub const COUNT: usize = 10;

    pub const ALL: [Feature; Feature::COUNT] = [
        Feature::ReturnOnSales,
        Feature::ActivityTotalAssetTurnover,
        Feature::AssetTurnoverDays,
        Feature::DaysTotalReceivablesOutstanding,
        Feature::InventoryTurnoverDays,
        Feature::LiquidityCashRatio,
        Feature::QuickRatio,
        Feature::CurrentRatio,
        Feature::ReturnOnAssets,
        Feature::ReturnOnEquity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::ReturnOnSales => "Return_on_Sales",
            Feature::ActivityTotalAssetTurnover => "Activity_Total_Asset_Turnover",
            Feature::AssetTurnoverDays => "Asset_Turnover_Days",
            Feature::DaysTotalReceivablesOutstanding => "Days_Total_Receivables_Outstanding",
            Feature::InventoryTurnoverDays => "Inventory_Turnover_Days",
            Feature::LiquidityCashRatio => "Liquidity_Cash_Ratio",
            Feature::QuickRatio => "Quick_Ratio",
            Feature::CurrentRatio => "Current_Ratio",
            Feature::ReturnOnAssets => "Return_on_Assets",
            Feature::ReturnOnEquity => "Return_on_Equity",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.name() == raw)
            .ok_or_else(|| raw.to_string())
    }
}

/// Fixed-order vector of engineered ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineeredFeatures {
    values: [f64; Feature::COUNT],
}

impl EngineeredFeatures {
    pub fn from_values(values: [f64; Feature::COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    pub fn values(&self) -> &[f64; Feature::COUNT] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().zip(self.values.iter().copied())
    }
}

impl Serialize for EngineeredFeatures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Feature::COUNT))?;
        for (feature, value) in self.iter() {
            map.serialize_entry(feature.name(), &value)?;
        }
        map.end()
    }
}

/// Derives the model's ratios from raw metrics.
///
/// Denominators are floored (1 for asset, equity and liability bases, 0.001
/// for the turnover used in the days reciprocal) so zero or negative inputs
/// saturate instead of dividing by zero. Nothing here rejects input.
pub fn engineer_features(metrics: &BusinessMetrics) -> EngineeredFeatures {
    let safe_assets = metrics.total_assets.max(1.0);
    let current_liabilities = (metrics.total_debt * CURRENT_DEBT_SHARE).max(1.0);
    let equity = (metrics.total_assets - metrics.total_debt).max(1.0);

    let monthly_outflow = metrics.monthly_wages + metrics.monthly_loan_payment;
    let monthly_revenue = (metrics.monthly_cash_surplus + monthly_outflow).max(1.0);
    let annual_revenue = monthly_revenue * 12.0;
    let annual_surplus = metrics.monthly_cash_surplus * 12.0;

    let asset_turnover = annual_revenue / safe_assets;
    let current_assets = safe_assets * CURRENT_ASSET_SHARE;
    let stock_share = (metrics.inventory_days / DAYS_PER_YEAR).clamp(0.0, 1.0);

    let mut values = [0.0; Feature::COUNT];
    values[Feature::ReturnOnSales.index()] = metrics.monthly_cash_surplus / monthly_revenue;
    values[Feature::ActivityTotalAssetTurnover.index()] = asset_turnover;
    values[Feature::AssetTurnoverDays.index()] = DAYS_PER_YEAR / asset_turnover.max(0.001);
    values[Feature::DaysTotalReceivablesOutstanding.index()] = ASSUMED_RECEIVABLE_DAYS;
    values[Feature::InventoryTurnoverDays.index()] = metrics.inventory_days;
    values[Feature::LiquidityCashRatio.index()] =
        metrics.monthly_cash_surplus / current_liabilities;
    values[Feature::QuickRatio.index()] =
        current_assets * (1.0 - stock_share) / current_liabilities;
    values[Feature::CurrentRatio.index()] = current_assets / current_liabilities;
    values[Feature::ReturnOnAssets.index()] = annual_surplus / safe_assets;
    values[Feature::ReturnOnEquity.index()] = annual_surplus / equity;

    EngineeredFeatures { values }
}
