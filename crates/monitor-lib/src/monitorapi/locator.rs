//! Pod and container locators
//!
//! A locator is a single line of space separated `key/value` tokens, e.g.
//! `ns/openshift-etcd pod/etcd-0 node/master-0 uid/1234 container/etcd`.
//! Downstream tooling greps these strings, so the rendered layout is fixed.
//!
//! Decoding never fails. A locator missing namespace, name or UID decodes to
//! the zero reference, and callers check `is_empty()`. Events produced from
//! kubelet text often carry no UID, which is why this is the common case and
//! not an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identity of a namespaced object
///
/// The UID is authoritative. Namespace and name alone only identify the
/// object inexactly, since a name can be reused after deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespacedReference {
    pub namespace: String,
    pub name: String,
    pub uid: String,
}

/// Reference to a single pod instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PodReference {
    #[serde(flatten)]
    pub reference: NamespacedReference,
}

impl PodReference {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        uid: impl Into<String>,
    ) -> Self {
        Self {
            reference: NamespacedReference {
                namespace: namespace.into(),
                name: name.into(),
                uid: uid.into(),
            },
        }
    }

    pub fn namespace(&self) -> &str {
        &self.reference.namespace
    }

    pub fn name(&self) -> &str {
        &self.reference.name
    }

    pub fn uid(&self) -> &str {
        &self.reference.uid
    }

    /// True for the zero reference returned when decoding fails
    pub fn is_empty(&self) -> bool {
        self.reference.uid.is_empty()
    }

    /// Render as `ns/<namespace> pod/<name> uid/<uid>`
    pub fn to_locator(&self) -> String {
        format!(
            "ns/{} pod/{} uid/{}",
            self.reference.namespace, self.reference.name, self.reference.uid
        )
    }
}

/// Reference to a container within a specific pod instance
///
/// A container name only means something next to its pod's UID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerReference {
    pub pod: PodReference,
    pub container_name: String,
}

impl ContainerReference {
    pub fn new(pod: PodReference, container_name: impl Into<String>) -> Self {
        Self {
            pod,
            container_name: container_name.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.container_name.is_empty() || self.pod.is_empty()
    }

    /// Render as `ns/<namespace> pod/<name> uid/<uid> container/<container>`
    pub fn to_locator(&self) -> String {
        format!(
            "ns/{} pod/{} uid/{} container/{}",
            self.pod.reference.namespace,
            self.pod.reference.name,
            self.pod.reference.uid,
            self.container_name
        )
    }
}

/// The fields of a live pod needed to locate it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PodDescriptor {
    pub namespace: String,
    pub name: String,
    pub node_name: String,
    pub uid: String,
}

/// Locator for a live pod, including the node it is scheduled to
pub fn locate_pod(pod: &PodDescriptor) -> String {
    format!(
        "ns/{} pod/{} node/{} uid/{}",
        pod.namespace, pod.name, pod.node_name, pod.uid
    )
}

/// Locator for one container of a live pod
pub fn locate_pod_container(pod: &PodDescriptor, container_name: &str) -> String {
    format!(
        "ns/{} pod/{} node/{} uid/{} container/{}",
        pod.namespace, pod.name, pod.node_name, pod.uid, container_name
    )
}

/// Split a locator into its `key/value` tokens
///
/// Each token is split on its first `/`. Tokens without a `/` are skipped
/// and a repeated key keeps the last value seen.
pub fn locator_parts(locator: &str) -> HashMap<String, String> {
    locator
        .split(' ')
        .filter_map(|token| token.split_once('/'))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Namespace from decoded locator parts, accepting `ns` or `namespace`
pub fn namespace_from(parts: &HashMap<String, String>) -> String {
    parts
        .get("ns")
        .or_else(|| parts.get("namespace"))
        .cloned()
        .unwrap_or_default()
}

pub fn namespace_from_locator(locator: &str) -> String {
    namespace_from(&locator_parts(locator))
}

/// Inexact `ns/<namespace> pod/<name>` locator for matching events that lack a UID
pub fn non_unique_pod_locator_from(locator: &str) -> String {
    let parts = locator_parts(locator);
    let namespace = namespace_from(&parts);
    let name = parts.get("pod").map(String::as_str).unwrap_or_default();
    format!("ns/{} pod/{}", namespace, name)
}

/// Decode a pod reference, or the zero reference if any identity field is missing
pub fn pod_from(locator: &str) -> PodReference {
    pod_from_parts(&locator_parts(locator))
}

fn pod_from_parts(parts: &HashMap<String, String>) -> PodReference {
    let namespace = namespace_from(parts);
    let name = parts.get("pod").cloned().unwrap_or_default();
    let uid = parts.get("uid").cloned().unwrap_or_default();
    if namespace.is_empty() || name.is_empty() || uid.is_empty() {
        return PodReference::default();
    }
    PodReference::new(namespace, name, uid)
}

/// Decode a container reference, or the zero reference if the container
/// name or the owning pod is missing
pub fn container_from(locator: &str) -> ContainerReference {
    let parts = locator_parts(locator);
    let pod = pod_from_parts(&parts);
    let name = parts.get("container").cloned().unwrap_or_default();
    if name.is_empty() || pod.is_empty() {
        return ContainerReference::default();
    }
    ContainerReference::new(pod, name)
}
