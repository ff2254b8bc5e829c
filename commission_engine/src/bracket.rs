//! Contract bracket table.
//!
//! Contract values are split into ordered, contiguous brackets.  Each
//! bracket carries a category label and one fixed bonus per tier, so
//! the bracket boundaries are written down exactly once.
//!
//! Bounds are whole currency units and adjacent brackets satisfy
//! `next.min == previous.max + 1`.  A value belongs to the last bracket
//! whose `min` it reaches, provided it is below the next bracket's
//! `min`; the final bracket additionally caps at its `max`.  Fractional
//! values between two integer edges (2900.50 with brackets ending at
//! 2900 and starting at 2901) therefore fall into the lower bracket.

use crate::error::{CommissionError, CommissionResult, ConfigError};
use crate::models::ExecutiveTier;
use serde::{Deserialize, Serialize};

/// A contract-value range with its category and fixed bonuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractBracket {
    pub min: f64,
    pub max: f64,
    pub category: String,
    pub bonus_junior: f64,
    pub bonus_pleno: f64,
    pub bonus_senior: f64,
}

impl ContractBracket {
    /// Fixed bonus paid to `tier` for contracts in this bracket.
    pub fn fixed_bonus_for(&self, tier: ExecutiveTier) -> f64 {
        match tier {
            ExecutiveTier::Junior => self.bonus_junior,
            ExecutiveTier::Pleno => self.bonus_pleno,
            ExecutiveTier::Senior => self.bonus_senior,
        }
    }
}

/// Ordered brackets, ascending by `min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ContractBracket>", into = "Vec<ContractBracket>")]
pub struct BracketTable {
    brackets: Vec<ContractBracket>,
}

impl BracketTable {
    /// Build a table, checking that the brackets partition a single
    /// contiguous range without overlap.
    pub fn new(brackets: Vec<ContractBracket>) -> Result<Self, ConfigError> {
        let Some(first) = brackets.first() else {
            return Err(ConfigError::EmptyBrackets);
        };
        if !(first.min > 0.0) {
            return Err(ConfigError::NonPositiveLowerBound(first.min));
        }
        for (index, bracket) in brackets.iter().enumerate() {
            for value in [bracket.min, bracket.max] {
                if !value.is_finite() || value.fract() != 0.0 {
                    return Err(ConfigError::NonIntegralBound { index, value });
                }
            }
            if bracket.min > bracket.max {
                return Err(ConfigError::InvertedBracket {
                    index,
                    min: bracket.min,
                    max: bracket.max,
                });
            }
        }
        for (offset, pair) in brackets.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let index = offset + 1;
            if current.min <= previous.max {
                return Err(ConfigError::Overlap {
                    index,
                    min: current.min,
                    previous_max: previous.max,
                });
            }
            if current.min != previous.max + 1.0 {
                return Err(ConfigError::Gap {
                    index,
                    min: current.min,
                    previous_max: previous.max,
                });
            }
        }
        Ok(Self { brackets })
    }

    /// Find the single bracket containing `contract_value`.
    ///
    /// Values below the first bracket, above the last one, zero,
    /// negative or NaN are rejected; there is no nearest-bracket
    /// fallback.
    pub fn bracket_for(&self, contract_value: f64) -> CommissionResult<&ContractBracket> {
        // Number of brackets whose lower bound has been reached.
        let reached = self.brackets.partition_point(|b| b.min <= contract_value);
        let bracket = reached
            .checked_sub(1)
            .and_then(|index| self.brackets.get(index))
            .ok_or(CommissionError::OutOfRange(contract_value))?;
        if reached == self.brackets.len() && contract_value > bracket.max {
            return Err(CommissionError::OutOfRange(contract_value));
        }
        Ok(bracket)
    }

    /// Lower bound of the whole table.
    pub fn lowest_min(&self) -> f64 {
        self.brackets.first().map_or(0.0, |b| b.min)
    }

    /// Upper bound of the whole table.
    pub fn highest_max(&self) -> f64 {
        self.brackets.last().map_or(0.0, |b| b.max)
    }

    pub fn brackets(&self) -> &[ContractBracket] {
        &self.brackets
    }
}

impl TryFrom<Vec<ContractBracket>> for BracketTable {
    type Error = ConfigError;

    fn try_from(brackets: Vec<ContractBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<ContractBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}
