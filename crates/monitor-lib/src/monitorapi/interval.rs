//! Event intervals and timeline ordering
//!
//! Intervals arrive from several asynchronous sources and often share
//! timestamps. Sorting them with [`compare_by_time_with_namespaced_pods`]
//! gives a deterministic log per run, with each namespace's pod construction
//! markers grouped at the head of the timeline.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::locator::namespace_from_locator;

/// A state that held for a resource between two instants
///
/// `from == to` denotes a point event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInterval {
    pub locator: String,
    pub message: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl EventInterval {
    pub fn new(
        locator: impl Into<String>,
        message: impl Into<String>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Self {
        Self {
            locator: locator.into(),
            message: message.into(),
            from,
            to,
        }
    }

    /// A point event at `at`
    pub fn instant(locator: impl Into<String>, message: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::new(locator, message, at, at)
    }

    pub fn is_instant(&self) -> bool {
        self.from == self.to
    }

    /// True when the locator contains every token of `locator`
    pub fn matches_locator(&self, locator: &str) -> bool {
        locator
            .split(' ')
            .filter(|token| !token.is_empty())
            .all(|token| self.locator.split(' ').any(|own| own == token))
    }
}

/// True when the interval marks the construction of a pod
pub fn is_pod_constructed(interval: &EventInterval) -> bool {
    interval.message.contains("constructed") && interval.locator.contains("pod/")
}

/// Timeline order for intervals
///
/// Pod construction intervals sort before everything else, by namespace.
/// All remaining ties break on `from`, then `to`, then `message`.
pub fn compare_by_time_with_namespaced_pods(lhs: &EventInterval, rhs: &EventInterval) -> Ordering {
    let group = match (is_pod_constructed(lhs), is_pod_constructed(rhs)) {
        (true, true) => {
            namespace_from_locator(&lhs.locator).cmp(&namespace_from_locator(&rhs.locator))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    };

    group
        .then_with(|| lhs.from.cmp(&rhs.from))
        .then_with(|| lhs.to.cmp(&rhs.to))
        .then_with(|| lhs.message.cmp(&rhs.message))
}

/// Sort intervals in place into timeline order
pub fn sort_by_time_with_namespaced_pods(intervals: &mut [EventInterval]) {
    intervals.sort_unstable_by(compare_by_time_with_namespaced_pods);
}

/// Intervals in timeline order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    intervals: Vec<EventInterval>,
}

impl Timeline {
    pub fn new(mut intervals: Vec<EventInterval>) -> Self {
        sort_by_time_with_namespaced_pods(&mut intervals);
        Self { intervals }
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventInterval> {
        self.intervals.iter()
    }

    /// Intervals whose locator is in `namespace`, still in timeline order
    pub fn in_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a EventInterval> {
        self.intervals
            .iter()
            .filter(move |interval| namespace_from_locator(&interval.locator) == namespace)
    }

    /// Intervals whose locator contains every token of `locator`
    pub fn for_locator<'a>(&'a self, locator: &'a str) -> impl Iterator<Item = &'a EventInterval> {
        self.intervals
            .iter()
            .filter(move |interval| interval.matches_locator(locator))
    }

    pub fn into_inner(self) -> Vec<EventInterval> {
        self.intervals
    }
}

impl From<Vec<EventInterval>> for Timeline {
    fn from(intervals: Vec<EventInterval>) -> Self {
        Self::new(intervals)
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a EventInterval;
    type IntoIter = std::slice::Iter<'a, EventInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_equal_times_order_by_message() {
        let a = EventInterval::new("ns/x pod/p", "b-message", at(0), at(5));
        let b = EventInterval::new("ns/x pod/p", "a-message", at(0), at(5));
        assert_eq!(compare_by_time_with_namespaced_pods(&b, &a), Ordering::Less);

        let mut intervals = vec![a.clone(), b.clone()];
        sort_by_time_with_namespaced_pods(&mut intervals);
        assert_eq!(intervals, vec![b, a]);
    }

    #[test]
    fn test_from_then_to() {
        let early = EventInterval::new("", "z", at(0), at(10));
        let late = EventInterval::new("", "a", at(1), at(2));
        let short = EventInterval::new("", "z", at(0), at(3));
        let mut intervals = vec![late.clone(), early.clone(), short.clone()];
        sort_by_time_with_namespaced_pods(&mut intervals);
        assert_eq!(intervals, vec![short, early, late]);
    }

    #[test]
    fn test_constructed_precedes_earlier_events() {
        let constructed = EventInterval::instant("ns/b pod/p2 uid/2", "constructed", at(10));
        let earlier = EventInterval::instant("ns/a pod/p1 uid/1", "reason/Ready", at(0));
        assert_eq!(
            compare_by_time_with_namespaced_pods(&constructed, &earlier),
            Ordering::Less
        );
        assert_eq!(
            compare_by_time_with_namespaced_pods(&earlier, &constructed),
            Ordering::Greater
        );
    }

    #[test]
    fn test_constructed_group_orders_by_namespace_then_time() {
        let b = EventInterval::instant("ns/b pod/p2", "constructed", at(0));
        let a_late = EventInterval::instant("ns/a pod/p1", "constructed", at(5));
        let a_early = EventInterval::instant("ns/a pod/p3", "constructed", at(1));
        let mut intervals = vec![b.clone(), a_late.clone(), a_early.clone()];
        sort_by_time_with_namespaced_pods(&mut intervals);
        assert_eq!(intervals, vec![a_early, a_late, b]);
    }

    #[test]
    fn test_constructed_needs_pod_locator() {
        let node = EventInterval::instant("node/worker-1", "constructed", at(0));
        assert!(!is_pod_constructed(&node));
        let pod = EventInterval::instant("ns/a pod/x", "pod constructed", at(0));
        assert!(is_pod_constructed(&pod));
    }

    #[test]
    fn test_empty_fields_sort_first() {
        let empty = EventInterval::instant("", "", at(0));
        let named = EventInterval::instant("ns/a", "msg", at(0));
        assert_eq!(compare_by_time_with_namespaced_pods(&empty, &named), Ordering::Less);
        assert_eq!(compare_by_time_with_namespaced_pods(&empty, &empty), Ordering::Equal);
    }

    #[test]
    fn test_timeline_filters() {
        let timeline = Timeline::new(vec![
            EventInterval::instant("ns/a pod/p1 uid/1", "reason/Created", at(0)),
            EventInterval::instant("ns/b pod/p2 uid/2", "reason/Created", at(1)),
            EventInterval::instant("ns/a pod/p1 uid/1 container/c", "reason/Ready", at(2)),
        ]);
        assert_eq!(timeline.in_namespace("a").count(), 2);
        assert_eq!(timeline.for_locator("pod/p1 container/c").count(), 1);
        assert_eq!(timeline.for_locator("").count(), 3);
        assert_eq!(
            timeline
                .in_namespace("a")
                .filter(|i| i.matches_locator("container/c"))
                .count(),
            1
        );
    }

    #[test]
    fn test_instant_and_locator_matching() {
        let point = EventInterval::instant("ns/a pod/p1 uid/1", "reason/Ready", at(3));
        assert!(point.is_instant());
        assert!(!EventInterval::new("ns/a pod/p1", "m", at(0), at(1)).is_instant());

        assert!(point.matches_locator("pod/p1  ns/a"));
        assert!(!point.matches_locator("pod/p"));
        assert!(point.matches_locator(""));
    }
}
