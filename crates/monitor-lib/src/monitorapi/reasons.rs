//! Lifecycle reasons for pods and containers
//!
//! Each set partitions an entity's lifetime into non-overlapping states:
//! ordered by time, the intervals carrying reasons from one set form a
//! contiguous view of that entity. Reasons outside a set are overlays that do
//! not change the lifecycle phase.

use std::collections::HashSet;
use std::sync::LazyLock;

/// The same pod IP is in use by two pods at the same time
pub const POD_IP_REUSED: &str = "ReusedPodIP";

pub const POD_REASON_CREATED: &str = "Created";
pub const POD_REASON_GRACEFUL_DELETE_STARTED: &str = "GracefulDelete";
pub const POD_REASON_DELETED: &str = "Deleted";
pub const POD_REASON_SCHEDULED: &str = "Scheduled";

pub const CONTAINER_REASON_CONTAINER_EXIT: &str = "ContainerExit";
pub const CONTAINER_REASON_CONTAINER_START: &str = "ContainerStart";
pub const CONTAINER_REASON_CONTAINER_WAIT: &str = "ContainerWait";
pub const CONTAINER_REASON_READINESS_FAILED: &str = "ReadinessFailed";
pub const CONTAINER_REASON_READINESS_ERRORED: &str = "ReadinessErrored";
pub const CONTAINER_REASON_STARTUP_PROBE_FAILED: &str = "StartupProbeFailed";
pub const CONTAINER_REASON_READY: &str = "Ready";
pub const CONTAINER_REASON_NOT_READY: &str = "NotReady";

pub const POD_REASON_DELETED_BEFORE_SCHEDULING: &str = "DeletedBeforeScheduling";
pub const POD_REASON_DELETED_AFTER_COMPLETION: &str = "DeletedAfterCompletion";

/// Pod states from creation to deletion. A pod is identified by UID and does
/// not exist before `Created` or after `Deleted`.
pub static POD_LIFECYCLE_TRANSITION_REASONS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| {
        HashSet::from([
            POD_REASON_CREATED,
            POD_REASON_SCHEDULED,
            POD_REASON_GRACEFUL_DELETE_STARTED,
            POD_REASON_DELETED,
        ])
    });

/// Container states, bounded by `ContainerWait` and `ContainerExit`.
/// A container is identified by its pod plus the container name.
pub static CONTAINER_LIFECYCLE_TRANSITION_REASONS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| {
        HashSet::from([
            CONTAINER_REASON_CONTAINER_WAIT,
            CONTAINER_REASON_CONTAINER_START,
            CONTAINER_REASON_CONTAINER_EXIT,
        ])
    });

/// Container readiness, bounded by `ContainerStart` and `ContainerExit`.
/// Starts and ends not ready.
pub static CONTAINER_READINESS_TRANSITION_REASONS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from([CONTAINER_REASON_READY, CONTAINER_REASON_NOT_READY]));

pub static KUBELET_READINESS_CHECK_REASONS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| {
        HashSet::from([
            CONTAINER_REASON_READINESS_FAILED,
            CONTAINER_REASON_READINESS_ERRORED,
            CONTAINER_REASON_STARTUP_PROBE_FAILED,
        ])
    });

pub fn is_pod_lifecycle_reason(reason: &str) -> bool {
    POD_LIFECYCLE_TRANSITION_REASONS.contains(reason)
}

pub fn is_container_lifecycle_reason(reason: &str) -> bool {
    CONTAINER_LIFECYCLE_TRANSITION_REASONS.contains(reason)
}

pub fn is_container_readiness_reason(reason: &str) -> bool {
    CONTAINER_READINESS_TRANSITION_REASONS.contains(reason)
}

pub fn is_kubelet_readiness_check_reason(reason: &str) -> bool {
    KUBELET_READINESS_CHECK_REASONS.contains(reason)
}

/// Which transition set a reason belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonClass {
    PodLifecycle,
    ContainerLifecycle,
    ContainerReadiness,
    KubeletReadinessCheck,
}

impl std::fmt::Display for ReasonClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasonClass::PodLifecycle => write!(f, "pod-lifecycle"),
            ReasonClass::ContainerLifecycle => write!(f, "container-lifecycle"),
            ReasonClass::ContainerReadiness => write!(f, "container-readiness"),
            ReasonClass::KubeletReadinessCheck => write!(f, "kubelet-readiness-check"),
        }
    }
}

/// Classify a reason, `None` for overlay reasons outside every set
pub fn classify_reason(reason: &str) -> Option<ReasonClass> {
    if is_pod_lifecycle_reason(reason) {
        Some(ReasonClass::PodLifecycle)
    } else if is_container_lifecycle_reason(reason) {
        Some(ReasonClass::ContainerLifecycle)
    } else if is_container_readiness_reason(reason) {
        Some(ReasonClass::ContainerReadiness)
    } else if is_kubelet_readiness_check_reason(reason) {
        Some(ReasonClass::KubeletReadinessCheck)
    } else {
        None
    }
}
