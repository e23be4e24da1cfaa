//! Event interval model for cluster resource timelines
//!
//! This module provides:
//! - Locator encoding/decoding for pods and containers
//! - `key/value` annotation parsing for interval messages
//! - Lifecycle reason sets used to fold intervals into state timelines
//! - Timeline ordering for collected intervals

mod annotations;
mod interval;
mod locator;
pub mod reasons;


pub use annotations::{
    annotations_from_message, phase_from, reason_from, reasoned_message, reasoned_messagef,
};
pub use interval::{
    compare_by_time_with_namespaced_pods, is_pod_constructed, sort_by_time_with_namespaced_pods,
    EventInterval, Timeline,
};
pub use locator::{
    container_from, locate_pod, locate_pod_container, locator_parts, namespace_from,
    namespace_from_locator, non_unique_pod_locator_from, pod_from, ContainerReference,
    NamespacedReference, PodDescriptor, PodReference,
};
pub use reasons::{classify_reason, ReasonClass};
