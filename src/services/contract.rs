//! Contract-violation detector
//!
//! Adapters are external collaborators and may be buggy, so every raw
//! value an adapter returns is inspected before being treated as a
//! success. A misbehaving adapter that renders an error as an apologetic
//! string must never surface to the end user as a genuine answer.

use crate::providers::AdapterReply;

/// Text prefixes that mark an error-shaped "success"
const ERROR_PREFIXES: [&str; 4] = ["error:", "i apologize", "sorry, ", "failed"];

/// Inspect an adapter return value for an error disguised as success
///
/// Returns the violation reason, or `None` when the reply looks genuine.
pub fn detect_violation(reply: &AdapterReply) -> Option<String> {
    if let Some(err) = &reply.error {
        return Some(format!("adapter returned an explicit error field: {err}"));
    }

    if reply.finish_reason.as_deref() == Some("error") {
        return Some("adapter reported an error completion reason".to_string());
    }

    let lowered = reply.text.trim_start().to_lowercase();
    for prefix in ERROR_PREFIXES {
        if lowered.starts_with(prefix) {
            return Some(format!("response text begins with error-like prefix {prefix:?}"));
        }
    }

    None
}
