//! Bonus rate table.
//!
//! Each tier carries five bonus fractions.  All of them are applied
//! against the commission base, never against a running total, so the
//! order in which bonuses are added does not matter.

use crate::error::{CommissionError, CommissionResult, ConfigError};
use crate::models::ExecutiveTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The five percentage bonuses of one tier, as fractions in `[0, 1]`.
///
/// A zero `meta_geral` marks the tier as ineligible for that bonus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusRates {
    pub tier: ExecutiveTier,
    pub bradesco: f64,
    pub meta: f64,
    pub performance: f64,
    pub time: f64,
    pub meta_geral: f64,
}

impl BonusRates {
    pub fn is_meta_geral_eligible(&self) -> bool {
        self.meta_geral > 0.0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("bradesco", self.bradesco),
            ("meta", self.meta),
            ("performance", self.performance),
            ("time", self.time),
            ("meta_geral", self.meta_geral),
        ];
        for (field, value) in fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RateOutOfRange {
                    tier: self.tier.to_string(),
                    field,
                    value,
                    expected: "[0, 1]",
                });
            }
        }
        // Juniors never earn the company-wide goal bonus.
        if self.tier == ExecutiveTier::Junior && self.meta_geral != 0.0 {
            return Err(ConfigError::RateOutOfRange {
                tier: self.tier.to_string(),
                field: "meta_geral",
                value: self.meta_geral,
                expected: "0",
            });
        }
        Ok(())
    }
}

/// One [`BonusRates`] entry per recognised tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BonusRates>", into = "Vec<BonusRates>")]
pub struct BonusRateTable {
    rates: BTreeMap<ExecutiveTier, BonusRates>,
}

impl BonusRateTable {
    pub fn new(entries: Vec<BonusRates>) -> Result<Self, ConfigError> {
        let mut rates = BTreeMap::new();
        for entry in entries {
            entry.validate()?;
            if rates.insert(entry.tier, entry).is_some() {
                return Err(ConfigError::DuplicateTier {
                    table: "bonus rate",
                    tier: entry.tier.to_string(),
                });
            }
        }
        if let Some(missing) = ExecutiveTier::ALL.into_iter().find(|t| !rates.contains_key(t)) {
            return Err(ConfigError::MissingTier {
                table: "bonus rate",
                tier: missing.to_string(),
            });
        }
        Ok(Self { rates })
    }

    pub fn rates_for(&self, tier: ExecutiveTier) -> CommissionResult<&BonusRates> {
        self.rates
            .get(&tier)
            .ok_or_else(|| CommissionError::InvalidTier(tier.to_string()))
    }

    pub fn rates_for_code(&self, code: &str) -> CommissionResult<&BonusRates> {
        self.rates_for(code.parse()?)
    }
}

impl TryFrom<Vec<BonusRates>> for BonusRateTable {
    type Error = ConfigError;

    fn try_from(entries: Vec<BonusRates>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<BonusRateTable> for Vec<BonusRates> {
    fn from(table: BonusRateTable) -> Self {
        table.rates.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn rates(tier: ExecutiveTier, meta_geral: f64) -> BonusRates {
        BonusRates {
            tier,
            bradesco: 0.25,
            meta: 0.1,
            performance: 0.15,
            time: 0.1,
            meta_geral,
        }
    }

    fn complete() -> Vec<BonusRates> {
        vec![
            rates(ExecutiveTier::Junior, 0.0),
            rates(ExecutiveTier::Pleno, 0.05),
            rates(ExecutiveTier::Senior, 0.05),
        ]
    }

    #[test]
    fn test_rates_lookup() {
        let table = BonusRateTable::new(complete()).unwrap();
        let junior = table.rates_for(ExecutiveTier::Junior).unwrap();
        assert!(!junior.is_meta_geral_eligible());
        assert!(table.rates_for_code("PLENO").unwrap().is_meta_geral_eligible());
        assert_matches!(table.rates_for_code("INTERN"), Err(CommissionError::InvalidTier(_)));
    }

    #[test]
    fn test_junior_meta_geral_must_be_zero() {
        let mut entries = complete();
        entries[0] = rates(ExecutiveTier::Junior, 0.05);
        assert_matches!(
            BonusRateTable::new(entries),
            Err(ConfigError::RateOutOfRange { field: "meta_geral", .. })
        );
    }

    #[test]
    fn test_fraction_above_one_is_rejected() {
        let mut entries = complete();
        entries[1].bradesco = 25.0;
        assert_matches!(
            BonusRateTable::new(entries),
            Err(ConfigError::RateOutOfRange { field: "bradesco", .. })
        );
    }

    #[test]
    fn test_missing_tier_is_rejected() {
        let entries = complete().into_iter().skip(1).collect();
        assert_matches!(BonusRateTable::new(entries), Err(ConfigError::MissingTier { .. }));
    }
}
