//! Parser warnings with per-message deduplication.
//!
//! Recoverable anomalies (an unterminated character reference, a stray
//! close tag) can repeat thousands of times in a large document. Each
//! distinct message is logged once per component until
//! [`clear_warnings`] is called.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already logged (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Root of every warning's log target.
const TARGET_PREFIX: &str = "kestrel";

/// Log target for warnings from `component`, such as `kestrel::parser`.
#[must_use]
pub fn target_for(component: &str) -> String {
    format!("{TARGET_PREFIX}::{component}")
}

/// Warn about a recoverable anomaly (logged once per unique message)
///
/// # Example
/// ```
/// use kestrel_common::warning::{has_warned, warn_once};
///
/// warn_once("tokenizer", "missing semicolon after character reference");
/// assert!(has_warned("tokenizer", "missing semicolon after character reference"));
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_log = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_log {
        let target = target_for(component);
        log::warn!(target: target.as_str(), "{message}");
    }
}

/// Whether `message` has been logged for `component` since the last
/// [`clear_warnings`].
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&key))
}

/// Clear all recorded warnings (call before parsing a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_records_message() {
        let message = "duplicate-check message for warn_once";
        warn_once("test", message);
        warn_once("test", message);
        assert!(has_warned("test", message));
    }

    #[test]
    fn test_distinct_components_are_distinct_keys() {
        let message = "component-scoped message";
        warn_once("component-a", message);
        assert!(has_warned("component-a", message));
        assert!(!has_warned("component-b", message));
    }

    #[test]
    fn test_target_names_the_component() {
        assert_eq!(target_for("parser"), "kestrel::parser");
        assert_eq!(target_for("tokenizer"), "kestrel::tokenizer");
    }
}
