//! Per-context wiring state.
//!
//! A context owns one independent object graph. Everything mutable lives in
//! [`ContextState`] behind a single mutex that doubles as the wiring-session
//! lock: `make_beans`, `start` and `stop` take it for their whole dynamic
//! extent, which makes the per-context maps single-writer without any further
//! locking.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::error::{BoxError, WiringError};
use crate::key::Key;
use crate::logging::LogSink;
use crate::wiring::WiringSession;

/// Type-erased shared bean instance.
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// Type-erased construction supplier.
pub(crate) type Ctor =
    Arc<dyn Fn(&mut WiringSession<'_>) -> Result<Constructed, BoxError> + Send + Sync>;

/// Type-erased start/stop hook.
pub(crate) type Hook = Arc<dyn Fn(&AnyArc) + Send + Sync>;

/// Result of one construction: the instance stored under the requested key,
/// plus the concrete-keyed form when the runtime type differs (trait
/// suppliers).
pub(crate) struct Constructed {
    pub(crate) primary: AnyArc,
    pub(crate) concrete: Option<(Key, AnyArc)>,
}

/// One dependency declaration of an owning entity, in declaration order.
/// `resolved` stays `None` when resolution never completed.
#[derive(Clone)]
pub(crate) struct EdgeRecord {
    pub(crate) declared: Key,
    pub(crate) resolved: Option<Key>,
}

#[derive(Default)]
pub(crate) struct ContextState {
    /// Singleton store, one instance per key.
    pub(crate) objects: HashMap<Key, AnyArc>,
    /// Registered construction suppliers.
    pub(crate) constructions: HashMap<Key, Ctor>,
    pub(crate) start_table: HashMap<Key, Hook>,
    pub(crate) stop_table: HashMap<Key, Hook>,
    /// Keys currently mid-construction; re-entry means a cycle.
    pub(crate) pending: HashSet<Key>,
    /// Construction stack; the last entry is the current dependent that new
    /// dependency handles register against.
    pub(crate) owners: Vec<Key>,
    /// Wiring entry points in first-registration order.
    pub(crate) roots: Vec<Key>,
    /// Adjacency list of the wired graph; a missing entry means no
    /// dependencies.
    pub(crate) edges: HashMap<Key, Vec<EdgeRecord>>,
    /// Declared (trait) key -> concrete key of the instance backing it.
    pub(crate) aliases: HashMap<Key, Key>,
    pub(crate) started: HashSet<Key>,
    pub(crate) stopped: HashSet<Key>,
}

impl ContextState {
    /// Canonical node identity for traversal: the concrete key when the given
    /// key is a trait alias, the key itself otherwise.
    pub(crate) fn canonical(&self, key: &Key) -> Key {
        self.aliases.get(key).cloned().unwrap_or_else(|| key.clone())
    }
}

pub(crate) struct ContextShared {
    pub(crate) name: String,
    pub(crate) state: Mutex<ContextState>,
    pub(crate) logger: Mutex<Option<Arc<dyn LogSink>>>,
}

impl ContextShared {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Mutex::new(ContextState::default()),
            logger: Mutex::new(None),
        }
    }

    /// Logs at info level. The message closure runs only when a sink is
    /// installed; a broken sink never aborts wiring.
    pub(crate) fn log_info(&self, location: &'static str, message: impl FnOnce() -> String) {
        if let Ok(logger) = self.logger.lock() {
            if let Some(sink) = logger.as_ref() {
                sink.info(&self.name, location, &message());
            }
        }
    }

    /// Logs at error level, optionally with the failure that caused it.
    pub(crate) fn log_error(
        &self,
        location: &'static str,
        error: Option<&WiringError>,
        message: impl FnOnce() -> String,
    ) {
        if let Ok(logger) = self.logger.lock() {
            if let Some(sink) = logger.as_ref() {
                sink.error(
                    &self.name,
                    location,
                    &message(),
                    error.map(|e| e as &(dyn std::error::Error + 'static)),
                );
            }
        }
    }
}
