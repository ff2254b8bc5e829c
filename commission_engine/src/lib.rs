//! Commission Engine library crate.
//!
//! This crate exposes the sales-commission calculation engine and the
//! static rate tables it reads.  Callers build a
//! [`engine::CommissionEngine`] once at start-up and call
//! `calculate` with a [`models::CalculationRequest`] for each
//! commission to compute; [`report`] derives baseline listings and
//! monthly totals from the same engine.

pub mod bonus;
pub mod bracket;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod report;
pub mod tier;

pub use config::{CommissionTables, TablesHandle};
pub use engine::{calculate, CommissionEngine};
pub use error::{CommissionError, CommissionResult, ConfigError, ReportError};
pub use models::{BonusFlags, CalculationRequest, CalculationResult, ExecutiveTier};
