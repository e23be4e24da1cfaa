//! Locator and message inspection commands

use anyhow::Result;
use colored::Colorize;
use monitor_lib::monitorapi::{
    annotations_from_message, classify_reason, container_from, locator_parts,
    non_unique_pod_locator_from, pod_from, reason_from, ContainerReference, PodReference,
};
use monitor_lib::StructuredLogger;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::output::{color_reason, print_json, print_warning, OutputFormat};

/// Everything that can be decoded from one locator
#[derive(Debug, Serialize)]
pub struct DecodedLocator {
    pub parts: BTreeMap<String, String>,
    pub non_unique: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod: Option<PodReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerReference>,
}

pub fn decode_locator(locator: &str) -> DecodedLocator {
    let pod = pod_from(locator);
    let container = container_from(locator);
    DecodedLocator {
        parts: locator_parts(locator).into_iter().collect(),
        non_unique: non_unique_pod_locator_from(locator),
        pod: (!pod.is_empty()).then_some(pod),
        container: (!container.is_empty()).then_some(container),
    }
}

/// Everything that can be decoded from one interval message
#[derive(Debug, Serialize)]
pub struct DecodedMessage {
    pub annotations: BTreeMap<String, String>,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_class: Option<String>,
}

pub fn decode_message(message: &str) -> DecodedMessage {
    let reason = reason_from(message);
    DecodedMessage {
        annotations: annotations_from_message(message).into_iter().collect(),
        reason_class: classify_reason(&reason).map(|class| class.to_string()),
        reason,
    }
}

/// Show the decoded form of a locator
pub fn show_locator(locator: &str, format: OutputFormat) -> Result<()> {
    let decoded = decode_locator(locator);
    if decoded.pod.is_none() {
        StructuredLogger::new("monitorctl").log_undecodable_locator(locator);
    }

    match format {
        OutputFormat::Json => print_json(&decoded)?,
        OutputFormat::Table => {
            println!("{}", "Locator".bold());
            println!("{}", "=".repeat(50));
            for (key, value) in &decoded.parts {
                println!("{:<12} {}", format!("{}:", key), value.cyan());
            }
            println!();
            println!("Non-unique:  {}", decoded.non_unique);
            match (&decoded.pod, &decoded.container) {
                (_, Some(container)) => {
                    println!("Container:   {}", container.to_locator().green())
                }
                (Some(pod), None) => println!("Pod:         {}", pod.to_locator().green()),
                (None, None) => print_warning("No pod UID, only inexact matching is possible"),
            }
        }
    }

    Ok(())
}

/// Show the annotations and reason class of a message
pub fn show_message(message: &str, format: OutputFormat) -> Result<()> {
    let decoded = decode_message(message);

    match format {
        OutputFormat::Json => print_json(&decoded)?,
        OutputFormat::Table => {
            println!("Reason:      {}", color_reason(&decoded.reason));
            println!(
                "Class:       {}",
                decoded.reason_class.as_deref().unwrap_or("overlay")
            );
            for (key, value) in &decoded.annotations {
                println!("{:<12} {}", format!("{}:", key), value);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_container_locator() {
        let decoded = decode_locator("ns/default pod/web node/n1 uid/u1 container/nginx");
        assert_eq!(decoded.non_unique, "ns/default pod/web");
        assert_eq!(decoded.pod.unwrap().uid(), "u1");
        assert_eq!(decoded.container.unwrap().container_name, "nginx");
        assert_eq!(decoded.parts.get("node").unwrap(), "n1");
    }

    #[test]
    fn test_decode_partial_locator() {
        let decoded = decode_locator("ns/default pod/web");
        assert!(decoded.pod.is_none());
        assert!(decoded.container.is_none());
        assert_eq!(decoded.non_unique, "ns/default pod/web");
    }

    #[test]
    fn test_decode_message() {
        let decoded = decode_message("reason/ReadinessFailed probe/http timeout");
        assert_eq!(decoded.reason, "ReadinessFailed");
        assert_eq!(
            decoded.reason_class.as_deref(),
            Some("kubelet-readiness-check")
        );
        assert_eq!(decoded.annotations.get("probe").unwrap(), "http");

        let overlay = decode_message("reason/ReusedPodIP two pods share 10.0.0.4");
        assert!(overlay.reason_class.is_none());
    }
}
