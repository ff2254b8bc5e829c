//! Tier configuration store.
//!
//! Maps each [`ExecutiveTier`] to the fraction of the contract value
//! paid as commission base and to the conversion rate the tier is
//! expected to reach.  The store is validated when it is built and is
//! never mutated afterwards.

use crate::error::{CommissionError, CommissionResult, ConfigError};
use crate::models::ExecutiveTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Base percentage and target conversion rate of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    pub tier: ExecutiveTier,
    /// Fraction of the contract value used as commission base, in `(0, 1]`.
    pub base_percentage: f64,
    /// Conversion rate, in percent, that earns full equivalence.  In `(0, 100]`.
    pub target_conversion_rate: f64,
}

impl TierConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_percentage > 0.0 && self.base_percentage <= 1.0) {
            return Err(ConfigError::RateOutOfRange {
                tier: self.tier.to_string(),
                field: "base_percentage",
                value: self.base_percentage,
                expected: "(0, 1]",
            });
        }
        if !(self.target_conversion_rate > 0.0 && self.target_conversion_rate <= 100.0) {
            return Err(ConfigError::RateOutOfRange {
                tier: self.tier.to_string(),
                field: "target_conversion_rate",
                value: self.target_conversion_rate,
                expected: "(0, 100]",
            });
        }
        Ok(())
    }
}

/// One [`TierConfig`] per recognised tier.
///
/// Serialised as a list of entries; deserialisation runs the same
/// validation as [`TierConfigStore::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TierConfig>", into = "Vec<TierConfig>")]
pub struct TierConfigStore {
    configs: BTreeMap<ExecutiveTier, TierConfig>,
}

impl TierConfigStore {
    /// Build a store, rejecting duplicates, missing tiers and rates
    /// outside their documented ranges.
    pub fn new(entries: Vec<TierConfig>) -> Result<Self, ConfigError> {
        let mut configs = BTreeMap::new();
        for entry in entries {
            entry.validate()?;
            if configs.insert(entry.tier, entry).is_some() {
                return Err(ConfigError::DuplicateTier {
                    table: "tier config",
                    tier: entry.tier.to_string(),
                });
            }
        }
        for tier in ExecutiveTier::ALL {
            if !configs.contains_key(&tier) {
                return Err(ConfigError::MissingTier {
                    table: "tier config",
                    tier: tier.to_string(),
                });
            }
        }
        Ok(Self { configs })
    }

    /// Look up the configuration of `tier`.
    pub fn config_for(&self, tier: ExecutiveTier) -> CommissionResult<&TierConfig> {
        self.configs
            .get(&tier)
            .ok_or_else(|| CommissionError::InvalidTier(tier.to_string()))
    }

    /// Look up a tier given as an untrusted code.
    pub fn config_for_code(&self, code: &str) -> CommissionResult<&TierConfig> {
        self.config_for(code.parse()?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TierConfig> {
        self.configs.values()
    }
}

impl TryFrom<Vec<TierConfig>> for TierConfigStore {
    type Error = ConfigError;

    fn try_from(entries: Vec<TierConfig>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<TierConfigStore> for Vec<TierConfig> {
    fn from(store: TierConfigStore) -> Self {
        store.configs.into_values().collect()
    }
}
