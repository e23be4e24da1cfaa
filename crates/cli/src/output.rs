//! Output formatting utilities

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use colored::Colorize;
use monitor_lib::monitorapi::reasons::{
    CONTAINER_REASON_CONTAINER_EXIT, CONTAINER_REASON_CONTAINER_START,
    CONTAINER_REASON_CONTAINER_WAIT, CONTAINER_REASON_NOT_READY, CONTAINER_REASON_READINESS_ERRORED,
    CONTAINER_REASON_READINESS_FAILED, CONTAINER_REASON_READY,
    CONTAINER_REASON_STARTUP_PROBE_FAILED, POD_IP_REUSED, POD_REASON_CREATED,
    POD_REASON_GRACEFUL_DELETE_STARTED, POD_REASON_SCHEDULED,
};
use monitor_lib::EventInterval;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table from a list of items
pub fn print_table<T: Tabled>(items: &[T]) {
    if items.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    let table = Table::new(items).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a timestamp with second precision
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format the length of an interval, `-` for point events
pub fn format_span(interval: &EventInterval) -> String {
    if interval.is_instant() {
        return "-".to_string();
    }
    match (interval.to - interval.from).to_std() {
        Ok(span) => format_duration(span),
        Err(_) => "-".to_string(),
    }
}

/// Format a duration as `1h2m3s`, `4m5s` or `6s`
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else if duration.subsec_millis() > 0 && total < 10 {
        format!("{:.1}s", duration.as_secs_f64())
    } else {
        format!("{}s", seconds)
    }
}

/// Color a lifecycle reason by how alarming it is
pub fn color_reason(reason: &str) -> String {
    match reason {
        "" => "-".dimmed().to_string(),
        CONTAINER_REASON_READY
        | CONTAINER_REASON_CONTAINER_START
        | POD_REASON_CREATED
        | POD_REASON_SCHEDULED => reason.green().to_string(),
        CONTAINER_REASON_NOT_READY
        | CONTAINER_REASON_CONTAINER_WAIT
        | POD_REASON_GRACEFUL_DELETE_STARTED => reason.yellow().to_string(),
        CONTAINER_REASON_READINESS_FAILED
        | CONTAINER_REASON_READINESS_ERRORED
        | CONTAINER_REASON_STARTUP_PROBE_FAILED
        | CONTAINER_REASON_CONTAINER_EXIT
        | POD_IP_REUSED => reason.red().to_string(),
        _ => reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(3723)), "1h2m3s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m5s");
        assert_eq!(format_duration(Duration::from_secs(42)), "42s");
        assert_eq!(format_duration(Duration::from_millis(2500)), "2.5s");
        assert_eq!(format_duration(Duration::ZERO), "0s");
    }

    #[test]
    fn test_format_span() {
        let from = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let to = Utc.timestamp_opt(1_700_000_090, 0).unwrap();
        assert_eq!(format_span(&EventInterval::new("ns/a", "m", from, to)), "1m30s");
        assert_eq!(format_span(&EventInterval::instant("ns/a", "m", from)), "-");
    }

    #[test]
    fn test_color_reason_keeps_reason_text() {
        assert!(color_reason("").contains('-'));
        assert!(color_reason(POD_REASON_GRACEFUL_DELETE_STARTED).contains("GracefulDelete"));
        assert!(color_reason(POD_IP_REUSED).contains("ReusedPodIP"));
        assert!(color_reason(CONTAINER_REASON_STARTUP_PROBE_FAILED).contains("StartupProbeFailed"));
        assert_eq!(color_reason("Custom"), "Custom");
    }
}
