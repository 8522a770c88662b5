//! Start/stop traversal over the wired object graph.

use crate::context::{ContextShared, ContextState};
use crate::error::{WiringError, WiringResult};
use crate::key::Key;
use crate::logging::{loc, StopWatch};

/// Two-method start/stop capability a bean may implement itself.
///
/// Register it with [`Injector::define_lifecycle`](crate::Injector::define_lifecycle);
/// the traversal then invokes these instead of separate callbacks. A later
/// `define_start`/`define_stop` registration for the same type replaces the
/// bridged hooks.
pub trait Lifecycle {
    fn start(&self);
    fn stop(&self);
}

#[derive(Clone, Copy)]
enum Phase {
    Start,
    Stop,
}

/// Starts every bean reachable from the roots, dependencies before
/// dependents. The started set makes repeated calls idempotent and keeps
/// shared sub-graphs from starting twice.
pub(crate) fn start_all(shared: &ContextShared, state: &mut ContextState) -> WiringResult<()> {
    if state.roots.is_empty() {
        let err = WiringError::NoRootsDefined;
        shared.log_error(loc!(), Some(&err), || {
            "No beans made yet, see Injector::make_beans(..).".to_string()
        });
        return Err(err);
    }
    state.stopped.clear();
    for root in state.roots.clone() {
        start_visit(shared, state, &root);
    }
    Ok(())
}

fn start_visit(shared: &ContextShared, state: &mut ContextState, key: &Key) {
    let node = state.canonical(key);
    if !state.started.insert(node.clone()) {
        return;
    }
    for edge in state.edges.get(&node).cloned().unwrap_or_default() {
        if let Some(target) = edge.resolved {
            start_visit(shared, state, &target);
        }
    }
    invoke(shared, state, &node, key, Phase::Start);
}

/// Stops every bean reachable from the roots. Ordering is dependents before
/// dependencies: a bean's own stop hook runs before the beans it depends on
/// are stopped. Clears the started set so a later `start()` runs again.
pub(crate) fn stop_all(shared: &ContextShared, state: &mut ContextState) {
    state.started.clear();
    for root in state.roots.clone() {
        stop_visit(shared, state, &root);
    }
}

fn stop_visit(shared: &ContextShared, state: &mut ContextState, key: &Key) {
    let node = state.canonical(key);
    if !state.stopped.insert(node.clone()) {
        return;
    }
    invoke(shared, state, &node, key, Phase::Stop);
    for edge in state.edges.get(&node).cloned().unwrap_or_default() {
        if let Some(target) = edge.resolved {
            stop_visit(shared, state, &target);
        }
    }
}

/// Invokes the hook registered for the node, preferring the concrete key and
/// falling back to the declared (trait) key. At most one hook runs per node.
fn invoke(shared: &ContextShared, state: &ContextState, node: &Key, declared: &Key, phase: Phase) {
    let table = match phase {
        Phase::Start => &state.start_table,
        Phase::Stop => &state.stop_table,
    };
    for key in [node, declared] {
        if let Some(hook) = table.get(key) {
            if let Some(instance) = state.objects.get(key) {
                let watch = StopWatch::start();
                hook(instance);
                let verb = match phase {
                    Phase::Start => "Started",
                    Phase::Stop => "Stopped",
                };
                shared.log_info(loc!(), || {
                    format!("{} {} in {}ms.", verb, node.display_name(), watch.millis())
                });
            }
            return;
        }
    }
}
