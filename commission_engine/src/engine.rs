//! Commission computation engine.
//!
//! The `engine` module turns a [`CalculationRequest`] into a fully
//! itemised [`CalculationResult`].  The computation is a pure function
//! of the request and a [`CommissionTables`] snapshot; batches are
//! spread across CPU cores with [`rayon`], since every request is
//! independent of the others.

use crate::config::{CommissionTables, TablesHandle};
use crate::error::{CommissionError, CommissionResult, ConfigError};
use crate::models::{BonusFlags, CalculationRequest, CalculationResult, ExecutiveTier};
use rayon::prelude::*;
use std::sync::Arc;

/// Decimal places of monetary and percentage fields.
const MONEY_DECIMALS: i32 = 2;
/// Decimal places of the conversion multiplier.
const MULTIPLIER_DECIMALS: i32 = 4;

/// Calculator bound to a process-wide, swappable set of tables.
pub struct CommissionEngine {
    tables: TablesHandle,
}

impl CommissionEngine {
    pub fn new(tables: CommissionTables) -> Self {
        Self {
            tables: TablesHandle::new(tables),
        }
    }

    /// Engine running on the compiled-in tables.
    pub fn canonical() -> Result<Self, ConfigError> {
        Ok(Self::new(CommissionTables::canonical()?))
    }

    pub fn tables(&self) -> &TablesHandle {
        &self.tables
    }

    pub fn calculate(&self, request: &CalculationRequest) -> CommissionResult<CalculationResult> {
        calculate(request, &self.tables.snapshot())
    }

    /// Calculate many requests in parallel.  Results are returned in
    /// input order, one per request; a rejected request does not affect
    /// the others.  The whole batch sees the same table snapshot.
    pub fn calculate_batch(
        &self,
        requests: &[CalculationRequest],
    ) -> Vec<CommissionResult<CalculationResult>> {
        let tables: Arc<CommissionTables> = self.tables.snapshot();
        requests
            .par_iter()
            .map(|request| calculate(request, &tables))
            .collect()
    }

    /// Commission of a contract at full conversion equivalence and
    /// without any percentage bonus.
    pub fn baseline(
        &self,
        contract_value: f64,
        tier: ExecutiveTier,
    ) -> CommissionResult<CalculationResult> {
        calculate_baseline(contract_value, tier, &self.tables.snapshot())
    }
}

/// Build the baseline request for a contract: conversion pinned to the
/// tier's own target and every bonus flag off.
pub fn baseline_request(
    contract_value: f64,
    tier: ExecutiveTier,
    tables: &CommissionTables,
) -> CommissionResult<CalculationRequest> {
    let target = tables.tiers.config_for(tier)?.target_conversion_rate;
    Ok(CalculationRequest::new(contract_value, target, tier).with_bonuses(BonusFlags::none()))
}

pub fn calculate_baseline(
    contract_value: f64,
    tier: ExecutiveTier,
    tables: &CommissionTables,
) -> CommissionResult<CalculationResult> {
    calculate(&baseline_request(contract_value, tier, tables)?, tables)
}

/// The tier a request is computed for: the override when present,
/// otherwise the request's own tier.
pub fn effective_tier(request: &CalculationRequest) -> CommissionResult<ExecutiveTier> {
    match &request.tier_override {
        Some(code) => code.parse(),
        None => Ok(request.tier),
    }
}

/// Calculate the commission owed for one request.
///
/// Fails with `InvalidTier` when the override names no known tier and
/// with `OutOfRange` when the contract value falls in no bracket.  All
/// intermediate values are kept at full precision and rounded once,
/// when the result is assembled.
pub fn calculate(
    request: &CalculationRequest,
    tables: &CommissionTables,
) -> CommissionResult<CalculationResult> {
    let tier = effective_tier(request)?;
    let tier_config = tables.tiers.config_for(tier)?;
    if !(request.contract_value > 0.0) {
        return Err(CommissionError::OutOfRange(request.contract_value));
    }
    let bracket = tables.brackets.bracket_for(request.contract_value)?;
    let rates = tables.bonus_rates.rates_for(tier)?;

    let commission_base = request.contract_value * tier_config.base_percentage;
    let fixed_bonus = bracket.fixed_bonus_for(tier);

    let flags = &request.bonuses;
    let bonus = |requested: bool, rate: f64| if requested { commission_base * rate } else { 0.0 };
    let bonus_bradesco = bonus(flags.bradesco, rates.bradesco);
    let bonus_meta = bonus(flags.meta, rates.meta);
    let bonus_performance = bonus(flags.performance, rates.performance);
    let bonus_time = bonus(flags.time, rates.time);
    // Ineligible tiers get nothing rather than an error.
    let bonus_meta_geral = bonus(
        flags.meta_geral && rates.is_meta_geral_eligible(),
        rates.meta_geral,
    );

    let gross_commission = commission_base
        + fixed_bonus
        + bonus_bradesco
        + bonus_meta
        + bonus_performance
        + bonus_time
        + bonus_meta_geral;
    let multiplier = conversion_multiplier(request.conversion_rate, tier_config.target_conversion_rate);
    let final_commission = gross_commission * multiplier;
    let final_percentage = final_commission / request.contract_value * 100.0;

    log::debug!(
        "tier={} category={} multiplier={:.4} final={:.2}",
        tier,
        bracket.category,
        multiplier,
        final_commission
    );

    Ok(CalculationResult {
        contract_value: request.contract_value,
        commission_base: round_money(commission_base),
        fixed_bonus: round_money(fixed_bonus),
        bonus_bradesco: round_money(bonus_bradesco),
        bonus_meta: round_money(bonus_meta),
        bonus_performance: round_money(bonus_performance),
        bonus_time: round_money(bonus_time),
        bonus_meta_geral: round_money(bonus_meta_geral),
        gross_commission: round_money(gross_commission),
        conversion_multiplier: round_to(multiplier, MULTIPLIER_DECIMALS),
        final_commission: round_money(final_commission),
        final_percentage: round_money(final_percentage),
        category: bracket.category.clone(),
        target_conversion_rate: round_money(tier_config.target_conversion_rate),
        tier,
    })
}

/// Realised conversion relative to the target, capped at 1.  Zero,
/// negative and NaN rates pay nothing.
pub fn conversion_multiplier(conversion_rate: f64, target_conversion_rate: f64) -> f64 {
    if conversion_rate.is_nan() || conversion_rate <= 0.0 {
        return 0.0;
    }
    (conversion_rate / target_conversion_rate).min(1.0)
}

pub(crate) fn round_money(value: f64) -> f64 {
    round_to(value, MONEY_DECIMALS)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
