//! Contract listings and monthly commission reports.
//!
//! Historical contracts are priced at their baseline: the tier's own
//! target conversion rate and no percentage bonuses.  A listing keeps
//! every contract, marking the ones the engine rejects as invalid with
//! a zero commission, and a monthly report sums a listing over one
//! calendar month.

use crate::config::CommissionTables;
use crate::engine::{calculate_baseline, round_money};
use crate::error::ReportError;
use crate::models::ExecutiveTier;
use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One closed contract as delivered by the contract source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub id: u64,
    pub card_name: String,
    pub broker_name: String,
    pub value: f64,
    pub implanted_on: NaiveDate,
    pub status: String,
}

/// A contract together with its baseline commission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractCommission {
    #[serde(flatten)]
    pub contract: ContractRecord,
    /// Baseline final commission, zero when the contract is invalid.
    pub commission: f64,
    /// Whether the engine accepted the contract value.
    pub valid: bool,
}

/// Totals over one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub month: u32,
    pub year: i32,
    pub total_sold: f64,
    pub total_commission: f64,
    pub contract_count: usize,
}

/// Price every contract at its baseline for `tier`, in parallel.
pub fn list_contract_commissions(
    contracts: Vec<ContractRecord>,
    tier: ExecutiveTier,
    tables: &CommissionTables,
) -> Vec<ContractCommission> {
    contracts
        .into_par_iter()
        .map(|contract| match calculate_baseline(contract.value, tier, tables) {
            Ok(result) => ContractCommission {
                contract,
                commission: result.final_commission,
                valid: true,
            },
            Err(err) => {
                log::warn!("contract {} has no commission: {}", contract.id, err);
                ContractCommission {
                    contract,
                    commission: 0.0,
                    valid: false,
                }
            }
        })
        .collect()
}

/// Sum the contracts implanted in `month`/`year`.
pub fn monthly_report(
    month: u32,
    year: i32,
    listing: &[ContractCommission],
) -> Result<MonthlyReport, ReportError> {
    if !(1..=12).contains(&month) {
        return Err(ReportError::InvalidMonth(month));
    }
    let in_period: Vec<&ContractCommission> = listing
        .iter()
        .filter(|c| c.contract.implanted_on.month() == month && c.contract.implanted_on.year() == year)
        .collect();
    let total_sold: f64 = in_period.iter().map(|c| c.contract.value).sum();
    let total_commission: f64 = in_period.iter().map(|c| c.commission).sum();
    Ok(MonthlyReport {
        month,
        year,
        total_sold: round_money(total_sold),
        total_commission: round_money(total_commission),
        contract_count: in_period.len(),
    })
}
