use std::collections::BTreeMap;

use super::super::domain::SliderKey;
use super::super::scoring::Feature;

/// Static feature → sliders relation used to project importances onto the
/// controls a user can move. Every feature reaches at least one slider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderMap {
    targets: BTreeMap<Feature, Vec<SliderKey>>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("feature {0} is not mapped to any slider")]
    UnmappedFeature(Feature),
    #[error("unknown feature '{0}' in slider mapping")]
    UnknownFeature(String),
    #[error("unknown slider '{0}' in slider mapping")]
    UnknownSlider(String),
}

impl SliderMap {
    /// Builds a map, rejecting tables that leave a feature without a slider.
    pub fn new<I>(entries: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (Feature, Vec<SliderKey>)>,
    {
        let mut targets: BTreeMap<Feature, Vec<SliderKey>> = BTreeMap::new();
        for (feature, sliders) in entries {
            let slot = targets.entry(feature).or_default();
            for slider in sliders {
                if !slot.contains(&slider) {
                    slot.push(slider);
                }
            }
        }

        for feature in Feature::ALL {
            if !targets.get(&feature).is_some_and(|sliders| !sliders.is_empty()) {
                return Err(MappingError::UnmappedFeature(feature));
            }
        }

        Ok(Self { targets })
    }

    /// Parses a name-keyed table such as `{"Quick_Ratio": ["total_assets"]}`.
    pub fn from_names(raw: &BTreeMap<String, Vec<String>>) -> Result<Self, MappingError> {
        let mut entries = Vec::with_capacity(raw.len());
        for (feature_name, slider_names) in raw {
            let feature: Feature = feature_name.parse().map_err(MappingError::UnknownFeature)?;
            let sliders = slider_names
                .iter()
                .map(|name| {
                    name.parse::<SliderKey>()
                        .map_err(|_| MappingError::UnknownSlider(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            entries.push((feature, sliders));
        }
        Self::new(entries)
    }

    /// The production table.
    pub fn standard() -> Self {
        use Feature::*;
        use SliderKey::*;

        let targets = BTreeMap::from([
            (ReturnOnSales, vec![MonthlyCashSurplus, MonthlyWages, MonthlyLoanPayment]),
            (ActivityTotalAssetTurnover, vec![TotalAssets, MonthlyCashSurplus]),
            (AssetTurnoverDays, vec![TotalAssets]),
            (DaysTotalReceivablesOutstanding, vec![MonthlyCashSurplus]),
            (InventoryTurnoverDays, vec![InventoryDays]),
            (LiquidityCashRatio, vec![MonthlyCashSurplus, TotalDebt]),
            (QuickRatio, vec![TotalAssets, TotalDebt, InventoryDays]),
            (CurrentRatio, vec![TotalAssets, TotalDebt]),
            (ReturnOnAssets, vec![MonthlyCashSurplus, TotalAssets]),
            (ReturnOnEquity, vec![MonthlyCashSurplus, TotalAssets, TotalDebt]),
        ]);

        Self { targets }
    }

    pub fn sliders_for(&self, feature: Feature) -> &[SliderKey] {
        self.targets.get(&feature).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for SliderMap {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_covers_every_feature() {
        let standard = SliderMap::standard();
        let rebuilt = SliderMap::new(
            Feature::ALL
                .iter()
                .map(|feature| (*feature, standard.sliders_for(*feature).to_vec())),
        )
        .expect("standard table is complete");
        assert_eq!(rebuilt, standard);
    }

    #[test]
    fn every_slider_is_reachable() {
        let standard = SliderMap::standard();
        for slider in SliderKey::ALL {
            assert!(
                Feature::ALL
                    .iter()
                    .any(|feature| standard.sliders_for(*feature).contains(&slider)),
                "{slider} has no feature"
            );
        }
    }

    #[test]
    fn missing_feature_is_rejected() {
        let entries = Feature::ALL
            .iter()
            .filter(|feature| **feature != Feature::CurrentRatio)
            .map(|feature| (*feature, vec![SliderKey::TotalAssets]));
        assert_eq!(
            SliderMap::new(entries),
            Err(MappingError::UnmappedFeature(Feature::CurrentRatio))
        );
    }

    #[test]
    fn empty_target_list_is_rejected() {
        let entries = Feature::ALL.iter().map(|feature| {
            let sliders = if *feature == Feature::QuickRatio {
                Vec::new()
            } else {
                vec![SliderKey::TotalDebt]
            };
            (*feature, sliders)
        });
        assert_eq!(
            SliderMap::new(entries),
            Err(MappingError::UnmappedFeature(Feature::QuickRatio))
        );
    }

    #[test]
    fn parses_name_keyed_tables() {
        let mut raw: BTreeMap<String, Vec<String>> = Feature::ALL
            .iter()
            .map(|feature| (feature.name().to_string(), vec!["total_debt".to_string()]))
            .collect();
        assert!(SliderMap::from_names(&raw).is_ok());

        raw.insert("Return_on_Sales".to_string(), vec!["revenue".to_string()]);
        assert_eq!(
            SliderMap::from_names(&raw),
            Err(MappingError::UnknownSlider("revenue".to_string()))
        );
    }
}
