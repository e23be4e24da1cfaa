//! Observability infrastructure for the monitor library
//!
//! Provides:
//! - Prometheus counters for timeline sorting and allowance lookups
//! - Structured logging with tracing

use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{info, warn};

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<Option<MonitorMetricsInner>> = OnceLock::new();

struct MonitorMetricsInner {
    intervals_sorted: IntCounter,
    allowance_lookups: IntCounterVec,
    allowance_lookup_failures: IntCounterVec,
}

impl MonitorMetricsInner {
    fn register() -> prometheus::Result<Self> {
        Ok(Self {
            intervals_sorted: register_int_counter!(
                "monitor_intervals_sorted_total",
                "Total number of event intervals placed into timelines"
            )?,
            allowance_lookups: register_int_counter_vec!(
                "monitor_allowance_lookups_total",
                "Historical allowance lookups by threshold kind",
                &["threshold"]
            )?,
            allowance_lookup_failures: register_int_counter_vec!(
                "monitor_allowance_lookup_failures_total",
                "Historical allowance lookups that returned an error",
                &["threshold"]
            )?,
        })
    }
}

/// Monitor metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance. If registration
/// failed, every recording call is a no-op.
#[derive(Clone)]
pub struct MonitorMetrics {
    _private: (),
}

impl Default for MonitorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorMetrics {
    /// Create a new metrics handle (registers global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(|| match MonitorMetricsInner::register() {
            Ok(inner) => Some(inner),
            Err(e) => {
                warn!(error = %e, "Failed to register monitor metrics");
                None
            }
        });
        Self { _private: () }
    }

    fn inner(&self) -> Option<&MonitorMetricsInner> {
        GLOBAL_METRICS.get().and_then(Option::as_ref)
    }

    /// Record intervals placed into a timeline
    pub fn add_intervals_sorted(&self, count: usize) {
        if let Some(inner) = self.inner() {
            inner.intervals_sorted.inc_by(count as u64);
        }
    }

    /// Record a historical lookup for `threshold` ("fail" or "flake")
    pub fn inc_allowance_lookup(&self, threshold: &str) {
        if let Some(inner) = self.inner() {
            inner.allowance_lookups.with_label_values(&[threshold]).inc();
        }
    }

    pub fn inc_allowance_lookup_failure(&self, threshold: &str) {
        if let Some(inner) = self.inner() {
            inner
                .allowance_lookup_failures
                .with_label_values(&[threshold])
                .inc();
        }
    }

    /// Current failure count for `threshold`
    pub fn allowance_lookup_failures(&self, threshold: &str) -> u64 {
        self.inner()
            .map(|inner| {
                inner
                    .allowance_lookup_failures
                    .with_label_values(&[threshold])
                    .get()
            })
            .unwrap_or(0)
    }
}

/// Structured logger for monitor events
///
/// Provides consistent field names for timeline and allowance events.
#[derive(Clone)]
pub struct StructuredLogger {
    component: String,
}

impl StructuredLogger {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
        }
    }

    /// Log a timeline built from collected intervals
    pub fn log_timeline(&self, source: &str, intervals: usize, namespaces: usize) {
        info!(
            event = "timeline_built",
            component = %self.component,
            source = %source,
            intervals = intervals,
            namespaces = namespaces,
            "Built event timeline"
        );
    }

    /// Log resolved alert allowances
    pub fn log_allowance(
        &self,
        alert_name: &str,
        alert_namespace: &str,
        flake_after: Duration,
        fail_after: Option<Duration>,
    ) {
        info!(
            event = "allowance_resolved",
            component = %self.component,
            alert_name = %alert_name,
            alert_namespace = %alert_namespace,
            flake_after_secs = flake_after.as_secs_f64(),
            fail_after_secs = ?fail_after.map(|d| d.as_secs_f64()),
            "Resolved alert allowance"
        );
    }

    /// Log a locator that decoded to no pod reference
    pub fn log_undecodable_locator(&self, locator: &str) {
        warn!(
            event = "locator_without_pod",
            component = %self.component,
            locator = %locator,
            "Locator does not identify a pod instance"
        );
    }
}
