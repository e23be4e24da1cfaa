//! `key/value` annotations embedded in interval messages
//!
//! Messages look like `reason/Created phase/Pending pod was created`. The
//! same first-slash rule as locators applies, so a word such as `and/or` in
//! free text also parses as an annotation. Historical data is matched with
//! this exact behavior, so it is kept as is.

use std::collections::HashMap;
use std::fmt;

const REASON_KEY: &str = "reason";
const PHASE_KEY: &str = "phase";

/// Extract every `key/value` token from a message, last duplicate wins
pub fn annotations_from_message(message: &str) -> HashMap<String, String> {
    message
        .split_whitespace()
        .filter_map(|token| token.split_once('/'))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// The `reason/` annotation, or an empty string
pub fn reason_from(message: &str) -> String {
    annotation(message, REASON_KEY)
}

/// The `phase/` annotation, or an empty string
pub fn phase_from(message: &str) -> String {
    annotation(message, PHASE_KEY)
}

fn annotation(message: &str, key: &str) -> String {
    annotations_from_message(message)
        .remove(key)
        .unwrap_or_default()
}

/// Render `reason/<reason> <part1>; <part2>; ...`
pub fn reasoned_message<S: AsRef<str>>(reason: &str, parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("; ");
    format!("reason/{} {}", reason, joined)
}

/// Like [`reasoned_message`] with a single formatted part
///
/// ```
/// use monitor_lib::monitorapi::reasoned_messagef;
/// let msg = reasoned_messagef("ContainerExit", format_args!("code/{}", 137));
/// assert_eq!(msg, "reason/ContainerExit code/137");
/// ```
pub fn reasoned_messagef(reason: &str, args: fmt::Arguments<'_>) -> String {
    reasoned_message(reason, &[args.to_string()])
}
