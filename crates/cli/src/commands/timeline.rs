//! Timeline CLI command

use anyhow::{Context, Result};
use colored::Colorize;
use monitor_lib::monitorapi::{namespace_from_locator, reason_from};
use monitor_lib::{EventInterval, MonitorMetrics, StructuredLogger, Timeline};
use std::collections::BTreeSet;
use std::path::Path;
use tabled::Tabled;

use crate::output::{
    color_reason, format_span, format_timestamp, print_json, print_table, print_warning,
    OutputFormat,
};

/// Row for the timeline table
#[derive(Tabled)]
struct IntervalRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Locator")]
    locator: String,
    #[tabled(rename = "Message")]
    message: String,
}

impl From<&EventInterval> for IntervalRow {
    fn from(interval: &EventInterval) -> Self {
        Self {
            from: format_timestamp(&interval.from),
            duration: format_span(interval),
            reason: color_reason(&reason_from(&interval.message)),
            locator: interval.locator.clone(),
            message: interval.message.clone(),
        }
    }
}

/// Read a JSON array of intervals
pub fn load_intervals(path: &Path) -> Result<Vec<EventInterval>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read intervals from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse intervals in {}", path.display()))
}

/// Intervals of `timeline` matching the filters, in timeline order
pub fn filter_timeline(
    timeline: &Timeline,
    namespace: Option<&str>,
    locator: Option<&str>,
) -> Vec<EventInterval> {
    let locator = locator.unwrap_or_default();
    match namespace {
        Some(namespace) => timeline
            .in_namespace(namespace)
            .filter(|interval| interval.matches_locator(locator))
            .cloned()
            .collect(),
        None => timeline.for_locator(locator).cloned().collect(),
    }
}

/// Show intervals from `path` in timeline order
pub fn show_timeline(
    path: &Path,
    namespace: Option<String>,
    locator: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let timeline = Timeline::new(load_intervals(path)?);
    let total = timeline.len();
    let shown = filter_timeline(&timeline, namespace.as_deref(), locator.as_deref());

    let namespaces: BTreeSet<String> = shown
        .iter()
        .map(|i| namespace_from_locator(&i.locator))
        .collect();
    MonitorMetrics::new().add_intervals_sorted(total);
    StructuredLogger::new("monitorctl").log_timeline(
        &path.display().to_string(),
        shown.len(),
        namespaces.len(),
    );

    match format {
        OutputFormat::Json => print_json(&shown)?,
        OutputFormat::Table => {
            if shown.is_empty() {
                print_warning("No intervals matched");
                return Ok(());
            }
            let rows: Vec<IntervalRow> = shown.iter().map(IntervalRow::from).collect();
            print_table(&rows);
            println!(
                "\n{} of {} intervals across {} namespaces",
                shown.len().to_string().bold(),
                total,
                namespaces.len()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Write;

    fn at(secs: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn intervals() -> Vec<EventInterval> {
        vec![
            EventInterval::instant("ns/a pod/p1 uid/1", "reason/Ready", at(9)),
            EventInterval::instant("ns/b pod/p2 uid/2", "constructed", at(5)),
            EventInterval::instant("ns/a pod/p1 uid/1 container/c", "reason/ContainerStart", at(1)),
        ]
    }

    #[test]
    fn test_filter_timeline_orders_all() {
        let shown = filter_timeline(&Timeline::new(intervals()), None, None);
        let messages: Vec<&str> = shown.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["constructed", "reason/ContainerStart", "reason/Ready"]
        );
    }

    #[test]
    fn test_filter_timeline_filters() {
        let timeline = Timeline::new(intervals());
        assert_eq!(filter_timeline(&timeline, Some("a"), None).len(), 2);
        assert_eq!(
            filter_timeline(&timeline, Some("a"), Some("container/c")).len(),
            1
        );
        assert_eq!(filter_timeline(&timeline, None, Some("uid/2")).len(), 1);
        assert!(filter_timeline(&timeline, Some("missing"), None).is_empty());
    }

    #[test]
    fn test_row_marks_point_events() {
        let row = IntervalRow::from(&EventInterval::new(
            "ns/a pod/p1 uid/1",
            "reason/NotReady",
            at(0),
            at(65),
        ));
        assert_eq!(row.duration, "1m5s");
        let point = IntervalRow::from(&intervals()[0]);
        assert_eq!(point.duration, "-");
        assert_eq!(point.from, "2023-11-14 22:13:29");
    }

    #[test]
    fn test_load_intervals_round_trip_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&intervals()).unwrap().as_bytes())
            .unwrap();
        let loaded = load_intervals(file.path()).unwrap();
        assert_eq!(loaded, intervals());
    }

    #[test]
    fn test_load_intervals_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[{\"locator\": 1}]").unwrap();
        let err = load_intervals(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse intervals"));
    }
}
