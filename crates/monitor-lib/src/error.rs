//! Error types for the monitor library
//!
//! Locator and message decoding never fail; absence is reported through
//! zero-valued references. Only historical data access has an error channel.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading or querying historical alert statistics
#[derive(Debug, Error)]
pub enum HistoricalDataError {
    /// No record matched the alert, even after relaxing the job type
    #[error("no historical data for alert {alert_name:?} in namespace {alert_namespace:?}")]
    NoMatch {
        alert_name: String,
        alert_namespace: String,
    },

    #[error("failed to read historical data from {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse historical data")]
    Parse(#[from] serde_json::Error),

    /// A percentile was negative or not a finite number of seconds
    #[error("invalid {field} value {value} for alert {alert_name:?}")]
    InvalidDuration {
        alert_name: String,
        field: &'static str,
        value: f64,
    },
}

/// Errors surfaced by an allowance calculator
#[derive(Debug, Error)]
pub enum AllowanceError {
    #[error("historical lookup failed")]
    Lookup(#[from] HistoricalDataError),
}
