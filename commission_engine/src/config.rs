//! Commission table configuration.
//!
//! A [`CommissionTables`] bundles the tier store, the bonus rate table
//! and the bracket table.  Each part validates itself when it is built
//! (including when deserialised), so holding a `CommissionTables` means
//! holding a consistent set.  Tables are either the compiled-in
//! canonical set or loaded from a JSON file of the form:
//!
//! ```json
//! {
//!   "tiers": [{"tier": "PLENO", "base_percentage": 0.5, "target_conversion_rate": 60}],
//!   "bonus_rates": [{"tier": "PLENO", "bradesco": 0.25, "meta": 0.1, "performance": 0.15, "time": 0.05, "meta_geral": 0.05}],
//!   "brackets": [{"min": 500, "max": 1000, "category": "A – Básicos", "bonus_junior": 100, "bonus_pleno": 150, "bonus_senior": 200}]
//! }
//! ```
//!
//! [`TablesHandle`] holds the active set for the lifetime of the
//! process.  Readers take a snapshot without locking; a reload replaces
//! the whole set at once and never mutates one in place.

use crate::bonus::{BonusRateTable, BonusRates};
use crate::bracket::{BracketTable, ContractBracket};
use crate::error::ConfigError;
use crate::models::ExecutiveTier;
use crate::tier::{TierConfig, TierConfigStore};
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Canonical brackets: `(min, max, category, junior, pleno, senior)`.
const CANONICAL_BRACKETS: [(f64, f64, &str, f64, f64, f64); 12] = [
    (500.0, 1_000.0, "A – Básicos", 100.0, 150.0, 200.0),
    (1_001.0, 2_000.0, "A – Básicos", 200.0, 300.0, 400.0),
    (2_001.0, 2_900.0, "A – Básicos", 300.0, 400.0, 500.0),
    (2_901.0, 4_000.0, "B – Médios", 400.0, 550.0, 700.0),
    (4_001.0, 5_000.0, "B – Médios", 500.0, 700.0, 900.0),
    (5_001.0, 6_000.0, "B – Médios", 600.0, 800.0, 1_000.0),
    (6_001.0, 8_000.0, "C – Altos", 800.0, 1_100.0, 1_400.0),
    (8_001.0, 10_000.0, "C – Altos", 1_000.0, 1_400.0, 1_800.0),
    (10_001.0, 12_000.0, "D – Premium", 1_300.0, 1_800.0, 2_500.0),
    (12_001.0, 15_000.0, "D – Premium", 1_600.0, 2_200.0, 3_000.0),
    (15_001.0, 20_000.0, "D – Premium", 2_000.0, 2_800.0, 3_800.0),
    (20_001.0, 1_000_000.0, "D – Premium", 2_500.0, 3_500.0, 4_800.0),
];

/// Table rows as written in a JSON file, before validation.
#[derive(Deserialize)]
struct TableRows {
    tiers: Vec<TierConfig>,
    bonus_rates: Vec<BonusRates>,
    brackets: Vec<ContractBracket>,
}

/// The complete, validated set of tables the engine computes with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionTables {
    pub tiers: TierConfigStore,
    pub bonus_rates: BonusRateTable,
    pub brackets: BracketTable,
}

impl CommissionTables {
    /// The compiled-in tables.
    pub fn canonical() -> Result<Self, ConfigError> {
        let tiers = TierConfigStore::new(vec![
            TierConfig {
                tier: ExecutiveTier::Junior,
                base_percentage: 0.40,
                target_conversion_rate: 50.0,
            },
            TierConfig {
                tier: ExecutiveTier::Pleno,
                base_percentage: 0.50,
                target_conversion_rate: 60.0,
            },
            TierConfig {
                tier: ExecutiveTier::Senior,
                base_percentage: 0.70,
                target_conversion_rate: 70.0,
            },
        ])?;

        let bonus_rates = BonusRateTable::new(vec![
            BonusRates {
                tier: ExecutiveTier::Junior,
                bradesco: 0.25,
                meta: 0.10,
                performance: 0.15,
                time: 0.10,
                meta_geral: 0.0,
            },
            BonusRates {
                tier: ExecutiveTier::Pleno,
                bradesco: 0.25,
                meta: 0.10,
                performance: 0.15,
                time: 0.05,
                meta_geral: 0.05,
            },
            BonusRates {
                tier: ExecutiveTier::Senior,
                bradesco: 0.25,
                meta: 0.05,
                performance: 0.15,
                time: 0.10,
                meta_geral: 0.05,
            },
        ])?;

        let brackets = BracketTable::new(
            CANONICAL_BRACKETS
                .iter()
                .map(|&(min, max, category, junior, pleno, senior)| ContractBracket {
                    min,
                    max,
                    category: category.to_string(),
                    bonus_junior: junior,
                    bonus_pleno: pleno,
                    bonus_senior: senior,
                })
                .collect(),
        )?;

        Ok(Self {
            tiers,
            bonus_rates,
            brackets,
        })
    }

    /// Parse and validate tables from a JSON document.
    ///
    /// Malformed JSON is a `Parse` error; rows that parse but break a
    /// table rule come back as the specific variant (`Gap`,
    /// `MissingTier`, ...).
    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let rows: TableRows = serde_json::from_str(data)?;
        Ok(Self {
            tiers: TierConfigStore::new(rows.tiers)?,
            bonus_rates: BonusRateTable::new(rows.bonus_rates)?,
            brackets: BracketTable::new(rows.brackets)?,
        })
    }

    /// Read, parse and validate tables from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let tables = Self::from_json_str(&data).map_err(|err| {
            log::warn!("Rejected commission tables {:?}: {}", path, err);
            err
        })?;
        log::info!(
            "Loaded commission tables from {:?} ({} brackets)",
            path,
            tables.brackets.brackets().len()
        );
        Ok(tables)
    }
}

/// Process-wide holder of the active [`CommissionTables`].
pub struct TablesHandle {
    current: ArcSwap<CommissionTables>,
}

impl TablesHandle {
    pub fn new(tables: CommissionTables) -> Self {
        Self {
            current: ArcSwap::from_pointee(tables),
        }
    }

    /// The table set in effect right now.  A calculation should take
    /// one snapshot and use it throughout, so that a concurrent swap
    /// never mixes two table sets in one result.
    pub fn snapshot(&self) -> Arc<CommissionTables> {
        self.current.load_full()
    }

    /// Replace the active set, returning the previous one.
    pub fn swap(&self, tables: CommissionTables) -> Arc<CommissionTables> {
        log::info!("Swapping active commission tables");
        self.current.swap(Arc::new(tables))
    }

    /// Load a file and make it active.  On failure the current set is
    /// left untouched.
    pub fn reload_from_file(&self, path: &Path) -> Result<Arc<CommissionTables>, ConfigError> {
        let tables = CommissionTables::from_json_file(path)?;
        Ok(self.swap(tables))
    }
}
