//! Data models for the Commission Engine.
//!
//! The `models` module defines the serialisable request and result
//! types that flow through the engine, together with the
//! [`ExecutiveTier`] enumeration that drives every rate lookup.  These
//! types derive `Serialize` and `Deserialize` so that the collaborators
//! feeding the engine can exchange them as JSON.

use crate::error::CommissionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Seniority level of a salesperson.
///
/// Deserialised through [`FromStr`], so codes arriving as JSON obey the
/// same rule as every other untrusted tier code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum ExecutiveTier {
    Junior,
    Pleno,
    Senior,
}

impl ExecutiveTier {
    /// Every recognised tier, in ascending seniority.
    pub const ALL: [ExecutiveTier; 3] = [Self::Junior, Self::Pleno, Self::Senior];

    /// The canonical upper-case code, e.g. `"PLENO"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Junior => "JUNIOR",
            Self::Pleno => "PLENO",
            Self::Senior => "SENIOR",
        }
    }
}

impl fmt::Display for ExecutiveTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a tier code coming from outside the type system (a caller
/// supplied override, a token claim).  Case and surrounding whitespace
/// are ignored; anything else is rejected.
impl FromStr for ExecutiveTier {
    type Err = CommissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| CommissionError::InvalidTier(s.to_string()))
    }
}

impl TryFrom<String> for ExecutiveTier {
    type Error = CommissionError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        code.parse()
    }
}

/// Which of the five percentage bonuses the caller asks for.
///
/// The flags are independent.  Asking for a bonus the tier is not
/// eligible for is allowed and yields a zero amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusFlags {
    pub bradesco: bool,
    pub meta: bool,
    pub performance: bool,
    pub time: bool,
    pub meta_geral: bool,
}

impl BonusFlags {
    /// No bonus requested.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every bonus requested.
    pub fn all() -> Self {
        Self {
            bradesco: true,
            meta: true,
            performance: true,
            time: true,
            meta_geral: true,
        }
    }
}

/// Input to the commission calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Value of the closed contract.
    pub contract_value: f64,
    /// Realised conversion rate as a percentage (0 to 100).
    pub conversion_rate: f64,
    /// Tier of the salesperson the request is made for.
    pub tier: ExecutiveTier,
    /// Bonuses to apply on top of the commission base.
    #[serde(default)]
    pub bonuses: BonusFlags,
    /// Tier code that replaces `tier` for this calculation.  Only the
    /// authorisation layer decides who may set it; the engine merely
    /// checks that it names a recognised tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_override: Option<String>,
}

impl CalculationRequest {
    pub fn new(contract_value: f64, conversion_rate: f64, tier: ExecutiveTier) -> Self {
        Self {
            contract_value,
            conversion_rate,
            tier,
            bonuses: BonusFlags::none(),
            tier_override: None,
        }
    }

    pub fn with_bonuses(mut self, bonuses: BonusFlags) -> Self {
        self.bonuses = bonuses;
        self
    }

    pub fn with_tier_override(mut self, code: impl Into<String>) -> Self {
        self.tier_override = Some(code.into());
        self
    }
}

/// Fully itemised outcome of one calculation.
///
/// Monetary and percentage fields are rounded to two decimals, the
/// multiplier to four.  Nothing here is persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Echo of the contract value from the request.
    pub contract_value: f64,
    /// Contract value times the tier's base percentage.
    pub commission_base: f64,
    /// Fixed amount from the matching contract bracket.
    pub fixed_bonus: f64,
    pub bonus_bradesco: f64,
    pub bonus_meta: f64,
    pub bonus_performance: f64,
    pub bonus_time: f64,
    pub bonus_meta_geral: f64,
    /// Base, fixed bonus and percentage bonuses before conversion.
    pub gross_commission: f64,
    /// `min(conversion_rate / target_conversion_rate, 1)`.
    pub conversion_multiplier: f64,
    /// Gross commission scaled by the conversion multiplier.
    pub final_commission: f64,
    /// Final commission as a percentage of the contract value.
    pub final_percentage: f64,
    /// Category label of the matching bracket.
    pub category: String,
    /// Conversion rate expected of the tier at full equivalence.
    pub target_conversion_rate: f64,
    /// Tier actually used, after any override.
    pub tier: ExecutiveTier,
}
