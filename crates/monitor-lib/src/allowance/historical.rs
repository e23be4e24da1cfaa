//! Historical alert statistics
//!
//! Alert durations from previous CI runs, keyed by alert and job type. The
//! store answers with the closest record it has: when no record matches the
//! exact job type, job type fields are relaxed one at a time until something
//! matches.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::HistoricalDataError;

/// Alert state being measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    #[default]
    Pending,
    Firing,
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertLevel::Pending => write!(f, "pending"),
            AlertLevel::Firing => write!(f, "firing"),
        }
    }
}

/// Cluster topology and environment a job ran against
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct JobType {
    pub release: String,
    pub from_release: String,
    pub platform: String,
    pub architecture: String,
    pub network: String,
    pub topology: String,
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "release={} from={} platform={} arch={} network={} topology={}",
            self.release,
            self.from_release,
            self.platform,
            self.architecture,
            self.network,
            self.topology
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobField {
    FromRelease,
    Network,
    Topology,
    Architecture,
    Platform,
}

impl JobField {
    fn name(self) -> &'static str {
        match self {
            JobField::FromRelease => "from_release",
            JobField::Network => "network",
            JobField::Topology => "topology",
            JobField::Architecture => "architecture",
            JobField::Platform => "platform",
        }
    }

    fn value(self, job_type: &JobType) -> &str {
        match self {
            JobField::FromRelease => &job_type.from_release,
            JobField::Network => &job_type.network,
            JobField::Topology => &job_type.topology,
            JobField::Architecture => &job_type.architecture,
            JobField::Platform => &job_type.platform,
        }
    }
}

/// Relaxation order when no exact job type match exists; each step ignores
/// one more field. Release always has to match and is not listed.
const RELAXATION_ORDER: &[JobField] = &[
    JobField::FromRelease,
    JobField::Network,
    JobField::Topology,
    JobField::Architecture,
    JobField::Platform,
];

fn job_types_match(wanted: &JobType, candidate: &JobType, ignored: &[JobField]) -> bool {
    wanted.release == candidate.release
        && RELAXATION_ORDER
            .iter()
            .filter(|field| !ignored.contains(field))
            .all(|field| field.value(wanted) == field.value(candidate))
}

/// Lookup key for historical alert durations
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertDataKey {
    pub alert_name: String,
    pub alert_namespace: String,
    pub alert_level: AlertLevel,
    pub job_type: JobType,
}

impl AlertDataKey {
    fn identity(&self) -> AlertIdentity {
        AlertIdentity {
            alert_name: self.alert_name.clone(),
            alert_namespace: self.alert_namespace.clone(),
            alert_level: self.alert_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AlertIdentity {
    alert_name: String,
    alert_namespace: String,
    alert_level: AlertLevel,
}

/// Duration percentiles observed for one alert and job type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticalDuration {
    pub job_type: JobType,
    pub p50: Duration,
    pub p75: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub job_runs: u64,
}

/// On-disk form of one historical data row, percentiles in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HistoricalRecord {
    pub alert_name: String,
    #[serde(default)]
    pub alert_namespace: String,
    #[serde(default)]
    pub alert_level: AlertLevel,
    #[serde(flatten)]
    pub job_type: JobType,
    #[serde(rename = "P50", default)]
    pub p50: f64,
    #[serde(rename = "P75", default)]
    pub p75: f64,
    #[serde(rename = "P95")]
    pub p95: f64,
    #[serde(rename = "P99")]
    pub p99: f64,
    #[serde(default)]
    pub job_runs: u64,
}

impl HistoricalRecord {
    fn into_entry(self) -> Result<(AlertDataKey, StatisticalDuration), HistoricalDataError> {
        let seconds = |field: &'static str, value: f64| {
            Duration::try_from_secs_f64(value).map_err(|_| HistoricalDataError::InvalidDuration {
                alert_name: self.alert_name.clone(),
                field,
                value,
            })
        };

        let duration = StatisticalDuration {
            job_type: self.job_type.clone(),
            p50: seconds("P50", self.p50)?,
            p75: seconds("P75", self.p75)?,
            p95: seconds("P95", self.p95)?,
            p99: seconds("P99", self.p99)?,
            job_runs: self.job_runs,
        };
        let key = AlertDataKey {
            alert_name: self.alert_name,
            alert_namespace: self.alert_namespace,
            alert_level: self.alert_level,
            job_type: self.job_type,
        };
        Ok((key, duration))
    }
}

/// Source of historical alert durations
pub trait HistoricalDataSource: Send + Sync {
    /// Closest record for `key`, with a description of what was matched
    fn best_match_duration(
        &self,
        key: &AlertDataKey,
    ) -> Result<(StatisticalDuration, String), HistoricalDataError>;
}

/// In-memory historical data, usually loaded from a JSON export
#[derive(Debug, Clone, Default)]
pub struct HistoricalData {
    records: HashMap<AlertIdentity, Vec<StatisticalDuration>>,
}

impl HistoricalData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the record for `key`
    pub fn insert(&mut self, key: AlertDataKey, mut duration: StatisticalDuration) {
        duration.job_type = key.job_type.clone();
        let entries = self.records.entry(key.identity()).or_default();
        match entries.iter_mut().find(|existing| existing.job_type == key.job_type) {
            Some(existing) => *existing = duration,
            None => entries.push(duration),
        }
    }

    pub fn from_records(
        records: impl IntoIterator<Item = HistoricalRecord>,
    ) -> Result<Self, HistoricalDataError> {
        let mut data = Self::new();
        for record in records {
            let (key, duration) = record.into_entry()?;
            data.insert(key, duration);
        }
        Ok(data)
    }

    /// Parse a JSON array of records
    pub fn from_json_str(json: &str) -> Result<Self, HistoricalDataError> {
        let records: Vec<HistoricalRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, HistoricalDataError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| HistoricalDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data = Self::from_json_str(&json)?;
        debug!(path = %path.display(), records = data.len(), "Loaded historical alert data");
        Ok(data)
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Among equally close candidates, prefer the one backed by the most runs
    fn best_candidate<'a>(
        candidates: &'a [StatisticalDuration],
        wanted: &JobType,
        ignored: &[JobField],
    ) -> Option<&'a StatisticalDuration> {
        candidates
            .iter()
            .filter(|candidate| job_types_match(wanted, &candidate.job_type, ignored))
            .max_by(|lhs, rhs| {
                lhs.job_runs
                    .cmp(&rhs.job_runs)
                    .then_with(|| rhs.job_type.to_string().cmp(&lhs.job_type.to_string()))
            })
    }
}

impl HistoricalDataSource for HistoricalData {
    fn best_match_duration(
        &self,
        key: &AlertDataKey,
    ) -> Result<(StatisticalDuration, String), HistoricalDataError> {
        let no_match = || HistoricalDataError::NoMatch {
            alert_name: key.alert_name.clone(),
            alert_namespace: key.alert_namespace.clone(),
        };
        let candidates = self.records.get(&key.identity()).ok_or_else(no_match)?;

        for relaxed in 0..=RELAXATION_ORDER.len() {
            let ignored = &RELAXATION_ORDER[..relaxed];
            if let Some(found) = Self::best_candidate(candidates, &key.job_type, ignored) {
                let description = if ignored.is_empty() {
                    format!("exact match: {}", found.job_type)
                } else {
                    let names: Vec<&str> = ignored.iter().map(|field| field.name()).collect();
                    format!(
                        "closest match ignoring {}: {}",
                        names.join(", "),
                        found.job_type
                    )
                };
                debug!(
                    alert_name = %key.alert_name,
                    requested = %key.job_type,
                    matched = %description,
                    "Resolved historical alert data"
                );
                return Ok((found.clone(), description));
            }
        }

        Err(no_match())
    }
}
