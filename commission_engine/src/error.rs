//! Error types for the Commission Engine.
//!
//! Calculation failures and configuration failures are kept apart.  A
//! [`CommissionError`] is returned for a single rejected request and
//! has exactly two kinds; everything that can go wrong while loading
//! the rate tables is a [`ConfigError`] and is only ever raised at
//! load time.

use thiserror::Error;

/// Rejection of a single calculation request.
///
/// Both variants are terminal for the request: there is no partial
/// result and no fallback value.  Requests that are well formed but ask
/// for a bonus the tier is not eligible for are *not* errors; those
/// bonuses simply contribute zero.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommissionError {
    #[error("invalid executive tier: {0:?}")]
    InvalidTier(String),

    #[error("contract value {0} is outside every contract bracket")]
    OutOfRange(f64),
}

/// Result type alias for calculation operations.
pub type CommissionResult<T> = Result<T, CommissionError>;

/// Failure to load or validate a set of commission tables.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read commission tables: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse commission tables: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no {table} entry for tier {tier}")]
    MissingTier { table: &'static str, tier: String },

    #[error("duplicate {table} entry for tier {tier}")]
    DuplicateTier { table: &'static str, tier: String },

    #[error("{field} for tier {tier} is {value}, expected {expected}")]
    RateOutOfRange {
        tier: String,
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("bracket table is empty")]
    EmptyBrackets,

    #[error("lowest bracket starts at {0}, contract values must be positive")]
    NonPositiveLowerBound(f64),

    #[error("bracket {index} has min {min} greater than max {max}")]
    InvertedBracket { index: usize, min: f64, max: f64 },

    #[error("bracket {index} starts at {min} but the previous bracket ends at {previous_max}")]
    Overlap { index: usize, min: f64, previous_max: f64 },

    #[error("gap between bracket ending at {previous_max} and bracket {index} starting at {min}")]
    Gap { index: usize, min: f64, previous_max: f64 },

    #[error("bracket {index} bound {value} is not a finite whole amount")]
    NonIntegralBound { index: usize, value: f64 },
}

/// Failure to build a periodic commission report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
}
