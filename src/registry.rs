//! Process-wide registry of named wiring contexts.
//!
//! The registry maps context names to their shared state. Its mutex is held
//! only for map mutation, never for the (potentially slow, user-supplied)
//! construction logic that runs afterwards against the context itself.
//! Removing a name severs only the name binding: handles that still reference
//! the context keep working against the detached state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::context::ContextShared;

static CONTEXTS: Lazy<Mutex<HashMap<String, Arc<ContextShared>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Returns the named context, atomically creating an empty one if needed.
pub(crate) fn get_or_create(name: &str) -> Arc<ContextShared> {
    let mut contexts = CONTEXTS.lock().unwrap();
    contexts
        .entry(name.to_string())
        .or_insert_with(|| Arc::new(ContextShared::new(name)))
        .clone()
}

/// Detaches the name binding; existing references stay valid.
pub(crate) fn remove(name: &str) -> bool {
    CONTEXTS.lock().unwrap().remove(name).is_some()
}

/// Clears the whole registry, for teardown between independent scenarios.
pub(crate) fn remove_all() {
    CONTEXTS.lock().unwrap().clear();
}

/// Sorted snapshot of the currently registered context names.
pub(crate) fn names() -> Vec<String> {
    let mut names: Vec<String> = CONTEXTS.lock().unwrap().keys().cloned().collect();
    names.sort();
    names
}
