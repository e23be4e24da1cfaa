//! Alert allowances derived from historical statistics
//!
//! This module provides:
//! - Alert data keys and percentile records for historical lookups
//! - An in-memory historical store with closest-match degradation
//! - Allowance calculators deciding when an active alert flakes or fails

mod calculator;
mod historical;

pub use calculator::{
    never_fail, AllowanceCalculator, NeverFailAllowance, PercentileAllowances,
    NEVER_FAIL_ALLOWANCE,
};
pub use historical::{
    AlertDataKey, AlertLevel, HistoricalData, HistoricalDataSource, HistoricalRecord, JobType,
    StatisticalDuration,
};
