//! Alert test allowance calculators
//!
//! An allowance is how long an alert may sit at or above the level under
//! test. If an alert is pending for 4s, `flake_after` returns 2s and
//! `fail_after` returns 6s, the test flakes.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::historical::{AlertDataKey, HistoricalDataSource};
use crate::error::AllowanceError;
use crate::observability::MonitorMetrics;

/// Fail threshold used when an alert should never fail a run (24 hours)
pub const NEVER_FAIL_ALLOWANCE: Duration = Duration::from_secs(24 * 60 * 60);

const FAIL_THRESHOLD: &str = "fail";
const FLAKE_THRESHOLD: &str = "flake";

/// Provides the durations after which an alert test flakes and fails
pub trait AllowanceCalculator: Send + Sync {
    /// Duration an alert can be at or above the required level before failing
    fn fail_after(&self, key: &AlertDataKey) -> Result<Duration, AllowanceError>;

    /// Duration an alert can be at or above the required level before flaking
    fn flake_after(&self, key: &AlertDataKey) -> Duration;
}

impl<T: AllowanceCalculator + ?Sized> AllowanceCalculator for Box<T> {
    fn fail_after(&self, key: &AlertDataKey) -> Result<Duration, AllowanceError> {
        (**self).fail_after(key)
    }

    fn flake_after(&self, key: &AlertDataKey) -> Duration {
        (**self).flake_after(key)
    }
}

impl<T: AllowanceCalculator + ?Sized> AllowanceCalculator for Arc<T> {
    fn fail_after(&self, key: &AlertDataKey) -> Result<Duration, AllowanceError> {
        (**self).fail_after(key)
    }

    fn flake_after(&self, key: &AlertDataKey) -> Duration {
        (**self).flake_after(key)
    }
}

/// Fails at the historical P99 and flakes at the historical P95
pub struct PercentileAllowances {
    source: Arc<dyn HistoricalDataSource>,
    metrics: MonitorMetrics,
}

impl PercentileAllowances {
    pub fn new(source: Arc<dyn HistoricalDataSource>) -> Self {
        Self {
            source,
            metrics: MonitorMetrics::new(),
        }
    }
}

impl AllowanceCalculator for PercentileAllowances {
    fn fail_after(&self, key: &AlertDataKey) -> Result<Duration, AllowanceError> {
        self.metrics.inc_allowance_lookup(FAIL_THRESHOLD);
        match self.source.best_match_duration(key) {
            Ok((allowed, _)) => Ok(allowed.p99),
            Err(e) => {
                self.metrics.inc_allowance_lookup_failure(FAIL_THRESHOLD);
                Err(e.into())
            }
        }
    }

    /// Lookup errors are logged and yield a zero allowance
    fn flake_after(&self, key: &AlertDataKey) -> Duration {
        self.metrics.inc_allowance_lookup(FLAKE_THRESHOLD);
        match self.source.best_match_duration(key) {
            Ok((allowed, _)) => allowed.p95,
            Err(e) => {
                self.metrics.inc_allowance_lookup_failure(FLAKE_THRESHOLD);
                warn!(
                    alert_name = %key.alert_name,
                    error = %e,
                    "Historical lookup failed, using zero flake allowance"
                );
                Duration::ZERO
            }
        }
    }
}

/// Never fails; flakes exactly when the wrapped calculator would
///
/// Turns an alert test into a flake-only test, e.g. while a new alert is in
/// its grace period.
pub struct NeverFailAllowance {
    flake_delegate: Box<dyn AllowanceCalculator>,
}

impl AllowanceCalculator for NeverFailAllowance {
    fn fail_after(&self, _key: &AlertDataKey) -> Result<Duration, AllowanceError> {
        Ok(NEVER_FAIL_ALLOWANCE)
    }

    fn flake_after(&self, key: &AlertDataKey) -> Duration {
        self.flake_delegate.flake_after(key)
    }
}

/// Wrap `flake_delegate` so it can never fail a run
pub fn never_fail(flake_delegate: impl AllowanceCalculator + 'static) -> NeverFailAllowance {
    NeverFailAllowance {
        flake_delegate: Box::new(flake_delegate),
    }
}
