//! Monitor library for cluster event timelines
//!
//! This crate provides the core functionality for:
//! - Encoding and decoding pod/container locators and annotated messages
//! - Classifying lifecycle reasons into disjoint state sets
//! - Ordering event intervals into a reviewable timeline
//! - Deriving alert flake/fail allowances from historical statistics

pub mod allowance;
pub mod error;
pub mod monitorapi;
pub mod observability;

pub use allowance::{
    never_fail, AlertDataKey, AllowanceCalculator, HistoricalData, HistoricalDataSource,
    JobType, NeverFailAllowance, PercentileAllowances, StatisticalDuration,
};
pub use error::{AllowanceError, HistoricalDataError};
pub use monitorapi::{
    ContainerReference, EventInterval, NamespacedReference, PodDescriptor, PodReference,
    Timeline,
};
pub use observability::{MonitorMetrics, StructuredLogger};
