//! Alert allowance CLI command

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use monitor_lib::allowance::AlertLevel;
use monitor_lib::{
    never_fail, AlertDataKey, AllowanceCalculator, HistoricalData, HistoricalDataSource, JobType,
    PercentileAllowances, StructuredLogger,
};
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::output::{format_duration, print_info, print_json, OutputFormat};

/// Alert level accepted on the command line
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LevelArg {
    #[default]
    Pending,
    Firing,
}

impl From<LevelArg> for AlertLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Pending => AlertLevel::Pending,
            LevelArg::Firing => AlertLevel::Firing,
        }
    }
}

/// Alert and job type identifying a historical record
#[derive(Debug, Clone, Args)]
pub struct AlertKeyArgs {
    /// Alert name
    #[arg(long)]
    pub alert: String,

    /// Namespace the alert fires in
    #[arg(long, default_value = "")]
    pub alert_namespace: String,

    /// Alert level being measured
    #[arg(long, value_enum, default_value = "pending")]
    pub level: LevelArg,

    /// Release under test (e.g. 4.12)
    #[arg(long, default_value = "")]
    pub release: String,

    /// Release upgraded from, empty for install jobs
    #[arg(long, default_value = "")]
    pub from_release: String,

    #[arg(long, default_value = "")]
    pub platform: String,

    #[arg(long, default_value = "amd64")]
    pub architecture: String,

    #[arg(long, default_value = "")]
    pub network: String,

    #[arg(long, default_value = "ha")]
    pub topology: String,
}

impl From<AlertKeyArgs> for AlertDataKey {
    fn from(args: AlertKeyArgs) -> Self {
        AlertDataKey {
            alert_name: args.alert,
            alert_namespace: args.alert_namespace,
            alert_level: args.level.into(),
            job_type: JobType {
                release: args.release,
                from_release: args.from_release,
                platform: args.platform,
                architecture: args.architecture,
                network: args.network,
                topology: args.topology,
            },
        }
    }
}

/// Resolved thresholds for one alert
#[derive(Debug, Serialize)]
pub struct AllowanceReport {
    pub alert_name: String,
    pub matched: Option<String>,
    #[serde(rename = "flake_after_secs", serialize_with = "serialize_secs")]
    pub flake_after: Duration,
    #[serde(rename = "fail_after_secs", serialize_with = "serialize_optional_secs")]
    pub fail_after: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_error: Option<String>,
    pub never_fail: bool,
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

fn serialize_optional_secs<S: Serializer>(
    duration: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match duration {
        Some(duration) => serializer.serialize_some(&duration.as_secs_f64()),
        None => serializer.serialize_none(),
    }
}

/// Compute the flake and fail thresholds for `key`
pub fn resolve_allowance(
    source: Arc<dyn HistoricalDataSource>,
    key: &AlertDataKey,
    grace_period: bool,
) -> AllowanceReport {
    let matched = source.best_match_duration(key).ok().map(|(_, description)| description);

    let percentile = PercentileAllowances::new(source);
    let calculator: Box<dyn AllowanceCalculator> = if grace_period {
        Box::new(never_fail(percentile))
    } else {
        Box::new(percentile)
    };

    let flake_after = calculator.flake_after(key);
    let (fail_after, fail_error) = match calculator.fail_after(key) {
        Ok(duration) => (Some(duration), None),
        Err(e) => (None, Some(format!("{:#}", anyhow::Error::new(e)))),
    };

    AllowanceReport {
        alert_name: key.alert_name.clone(),
        matched,
        flake_after,
        fail_after,
        fail_error,
        never_fail: grace_period,
    }
}

/// Show the allowances for an alert using the historical data at `data`
pub fn show_allowance(
    data: Option<PathBuf>,
    default_data: Option<&Path>,
    key: AlertKeyArgs,
    grace_period: bool,
    format: OutputFormat,
) -> Result<()> {
    let path = data
        .as_deref()
        .or(default_data)
        .context("No historical data file given (use --data or MONITOR_HISTORICAL_DATA_PATH)")?;
    let source = HistoricalData::from_path(path)
        .with_context(|| format!("Failed to load historical data from {}", path.display()))?;

    let key = AlertDataKey::from(key);
    let report = resolve_allowance(Arc::new(source), &key, grace_period);

    StructuredLogger::new("monitorctl").log_allowance(
        &key.alert_name,
        &key.alert_namespace,
        report.flake_after,
        report.fail_after,
    );

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            println!("{}", format!("Allowance for {}", report.alert_name).bold());
            println!("{}", "=".repeat(50));
            match &report.matched {
                Some(description) => println!("Matched:     {}", description.dimmed()),
                None => print_info("No historical data matched this alert"),
            }
            println!(
                "Flake after: {}",
                format_duration(report.flake_after).yellow()
            );
            match (report.fail_after, &report.fail_error) {
                (Some(fail_after), _) => println!(
                    "Fail after:  {}{}",
                    format_duration(fail_after).red(),
                    if report.never_fail { " (never fail)" } else { "" }
                ),
                (None, Some(error)) => println!("Fail after:  {}", error.red()),
                (None, None) => println!("Fail after:  -"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_lib::StatisticalDuration;

    fn key_args(alert: &str) -> AlertKeyArgs {
        AlertKeyArgs {
            alert: alert.to_string(),
            alert_namespace: "openshift-monitoring".to_string(),
            level: LevelArg::Firing,
            release: "4.12".to_string(),
            from_release: String::new(),
            platform: "gcp".to_string(),
            architecture: "amd64".to_string(),
            network: "ovn".to_string(),
            topology: "ha".to_string(),
        }
    }

    fn source() -> Arc<dyn HistoricalDataSource> {
        let mut data = HistoricalData::new();
        data.insert(
            key_args("TargetDown").into(),
            StatisticalDuration {
                p95: Duration::from_secs(30),
                p99: Duration::from_secs(300),
                job_runs: 10,
                ..Default::default()
            },
        );
        Arc::new(data)
    }

    #[test]
    fn test_resolve_known_alert() {
        let key: AlertDataKey = key_args("TargetDown").into();
        let report = resolve_allowance(source(), &key, false);
        assert_eq!(report.flake_after, Duration::from_secs(30));
        assert_eq!(report.fail_after, Some(Duration::from_secs(300)));
        assert!(report.matched.unwrap().starts_with("exact match"));
        assert!(report.fail_error.is_none());
    }

    #[test]
    fn test_resolve_unknown_alert_reports_error() {
        let key: AlertDataKey = key_args("Unknown").into();
        let report = resolve_allowance(source(), &key, false);
        assert_eq!(report.flake_after, Duration::ZERO);
        assert!(report.fail_after.is_none());
        assert!(report.fail_error.unwrap().contains("no historical data"));
    }

    #[test]
    fn test_resolve_grace_period() {
        let key: AlertDataKey = key_args("Unknown").into();
        let report = resolve_allowance(source(), &key, true);
        assert_eq!(report.fail_after, Some(Duration::from_secs(86_400)));
        assert!(report.never_fail);
    }

    #[test]
    fn test_report_serializes_seconds() {
        let key: AlertDataKey = key_args("TargetDown").into();
        let report = resolve_allowance(source(), &key, false);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["flake_after_secs"], 30.0);
        assert_eq!(json["fail_after_secs"], 300.0);
        assert!(json.get("fail_error").is_none());

        let unknown: AlertDataKey = key_args("Unknown").into();
        let missing = resolve_allowance(source(), &unknown, false);
        let json = serde_json::to_value(&missing).unwrap();
        assert!(json["fail_after_secs"].is_null());
        assert!(json["fail_error"].is_string());
    }

    #[test]
    fn test_missing_data_path_is_error() {
        let err = show_allowance(None, None, key_args("TargetDown"), false, OutputFormat::Json)
            .unwrap_err();
        assert!(err.to_string().contains("No historical data file"));
    }
}
