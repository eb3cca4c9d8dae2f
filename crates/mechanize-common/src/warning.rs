//! Deduplicated warnings with colored terminal output.
//!
//! Library crates report recoverable problems (a selector truncated at a
//! lexical error, an unsupported node kind during HTML conversion) through
//! [`warn_once`]. Each distinct `[component] message` pair is printed a single
//! time per process until [`clear_warnings`] is called.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Every warning key printed so far.
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// A panic while holding the lock leaves the set itself intact, so a poisoned
/// mutex is recovered rather than propagated.
fn warned() -> MutexGuard<'static, Option<HashSet<String>>> {
    WARNED.lock().unwrap_or_else(PoisonError::into_inner)
}

fn key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Print a warning for `component` unless the same message was already shown.
///
/// # Example
/// ```ignore
/// warn_once("Selector", "selector \"#\" truncated at byte 1: expected id");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let should_print = warned()
        .get_or_insert_with(HashSet::new)
        .insert(key(component, message));

    if should_print {
        eprintln!("{YELLOW}[Mechanize {component}] warning: {message}{RESET}");
    }
}

/// Whether [`warn_once`] has recorded this exact warning since the last clear.
#[must_use]
pub fn has_warned(component: &str, message: &str) -> bool {
    warned()
        .as_ref()
        .is_some_and(|set| set.contains(&key(component, message)))
}

/// Forget every recorded warning so they print again.
pub fn clear_warnings() {
    if let Some(set) = warned().as_mut() {
        set.clear();
    }
}
