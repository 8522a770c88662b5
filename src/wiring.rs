//! The wiring session and object-graph resolution engine.
//!
//! A [`WiringSession`] is the dynamic extent of one
//! [`Injector::make_beans`](crate::Injector::make_beans) call. It borrows the
//! context state exclusively, so construction is single-writer by
//! construction: suppliers and [`Wired::wire`](crate::Wired::wire)
//! implementations receive `&mut WiringSession` and re-enter the engine
//! through it instead of through ambient thread-local state.

use std::sync::Arc;

use crate::context::{AnyArc, Constructed, ContextShared, ContextState, EdgeRecord};
use crate::dependency::Wired;
use crate::error::{BoxError, StoredTypeMismatch, WiringError};
use crate::key::Key;
use crate::logging::{loc, StopWatch};

/// Exclusive handle on a context during one wiring pass.
///
/// User code meets this type in two places: as the parameter of
/// [`Wired::wire`](crate::Wired::wire) and of construction suppliers. Both may
/// create [`Dependency`](crate::Dependency) handles through it, which is what
/// recursively wires the graph.
pub struct WiringSession<'a> {
    shared: &'a ContextShared,
    state: &'a mut ContextState,
}

impl<'a> WiringSession<'a> {
    pub(crate) fn new(shared: &'a ContextShared, state: &'a mut ContextState) -> Self {
        Self { shared, state }
    }

    /// Name of the context this session wires.
    pub fn context_name(&self) -> &str {
        &self.shared.name
    }

    /// Pure lookup of an already-constructed bean. No construction side
    /// effects; `None` if the type was never constructed in this context.
    ///
    /// Suppliers use this to hand out one instance under several service
    /// traits.
    pub fn get_bean<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let any = self.state.objects.get(&Key::of::<T>())?.clone();
        any.downcast::<T>().ok()
    }

    /// Pure lookup of a bean by its service trait.
    pub fn get_trait_bean<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.state
            .objects
            .get(&Key::of_trait::<T>())?
            .downcast_ref::<Arc<T>>()
            .cloned()
    }

    /// The entity currently under construction, which new dependency handles
    /// register against.
    pub(crate) fn current_dependent(&self) -> Option<Key> {
        self.state.owners.last().cloned()
    }

    /// Records a not-yet-resolved dependency declaration of `owner`,
    /// preserving declaration order. Returns the slot to mark resolved later.
    pub(crate) fn register_edge(&mut self, owner: &Key, declared: Key) -> usize {
        let list = self.state.edges.entry(owner.clone()).or_default();
        list.push(EdgeRecord { declared, resolved: None });
        list.len() - 1
    }

    pub(crate) fn resolve_edge(&mut self, owner: &Key, slot: usize, resolved: Key) {
        if let Some(edge) = self.state.edges.get_mut(owner).and_then(|list| list.get_mut(slot)) {
            edge.resolved = Some(resolved);
        }
    }

    /// Concrete key backing `declared`, once construction stored the alias.
    pub(crate) fn resolved_key(&self, declared: &Key) -> Key {
        self.state.canonical(declared)
    }

    pub(crate) fn log_injected(&self, dependent: &'static str, target: &'static str) {
        self.shared
            .log_info(loc!(), || format!("Injected {} -> {}.", dependent, target));
    }

    /// Get-or-create for a concrete type; falls back to `T::wire` when no
    /// supplier is registered.
    pub(crate) fn resolve_concrete<T: Wired>(&mut self) -> Result<Arc<T>, BoxError> {
        let key = Key::of::<T>();
        let fallback = |session: &mut WiringSession<'_>| -> Result<Constructed, BoxError> {
            let value = T::wire(session)?;
            Ok(Constructed {
                primary: Arc::new(value) as AnyArc,
                concrete: None,
            })
        };
        let any = self.get_or_create(&key, Some(&fallback))?;
        any.downcast::<T>()
            .map_err(|_| StoredTypeMismatch(key.display_name()).into())
    }

    /// Get-or-create for a service trait; there is no default construction
    /// path, a missing supplier is `ConstructionMissing`.
    pub(crate) fn resolve_trait<T: ?Sized + Send + Sync + 'static>(
        &mut self,
    ) -> Result<Arc<T>, BoxError> {
        let key = Key::of_trait::<T>();
        let any = self.get_or_create(&key, None)?;
        match any.downcast_ref::<Arc<T>>() {
            Some(service) => Ok(service.clone()),
            None => Err(StoredTypeMismatch(key.display_name()).into()),
        }
    }

    /// The resolution algorithm. Recursion happens indirectly: constructing
    /// the instance triggers nested [`Dependency`](crate::Dependency) handle
    /// creation, which re-enters this method for each declared target.
    fn get_or_create(
        &mut self,
        key: &Key,
        fallback: Option<&dyn Fn(&mut WiringSession<'_>) -> Result<Constructed, BoxError>>,
    ) -> Result<AnyArc, BoxError> {
        if self.state.pending.contains(key) {
            let mut path: Vec<&'static str> =
                self.state.owners.iter().map(|k| k.display_name()).collect();
            path.push(key.display_name());
            return Err(WiringError::CyclicDependency { path }.into());
        }
        if let Some(existing) = self.state.objects.get(key) {
            return Ok(existing.clone());
        }

        self.state.pending.insert(key.clone());
        self.state.owners.push(key.clone());
        // Fresh declaration list; a failed earlier attempt may have left one.
        self.state.edges.insert(key.clone(), Vec::new());

        let watch = StopWatch::start();
        let supplier = self.state.constructions.get(key).cloned();
        let via_supplier = supplier.is_some();
        let built = match supplier {
            Some(ctor) => ctor(&mut *self),
            None => match fallback {
                Some(default) => default(&mut *self),
                None => Err(WiringError::ConstructionMissing {
                    target: key.display_name(),
                }
                .into()),
            },
        };

        // Pending must clear on success and failure alike, so a later
        // non-cyclic request for the same key can construct or memoize.
        self.state.owners.pop();
        self.state.pending.remove(key);

        let constructed = built?;
        let primary = constructed.primary.clone();
        self.finish(key, constructed);
        self.shared.log_info(loc!(), || {
            format!(
                "Created {} using {} in {}ms.",
                key.display_name(),
                if via_supplier { "supplier" } else { "wire" },
                watch.millis()
            )
        });
        Ok(primary)
    }

    /// Stores a construction result, dual-keying under the concrete type when
    /// it differs from the requested key.
    fn finish(&mut self, key: &Key, constructed: Constructed) {
        self.state.objects.insert(key.clone(), constructed.primary);
        if let Some((concrete_key, concrete)) = constructed.concrete {
            if concrete_key != *key {
                self.state.aliases.insert(key.clone(), concrete_key.clone());
                let fresh_edges = self.state.edges.remove(key).unwrap_or_default();
                // A supplier may hand out an instance that is already stored
                // under its concrete key (one implementation behind several
                // traits); that instance's recorded edges must survive.
                let reused = matches!(
                    self.state.objects.get(&concrete_key),
                    Some(previous) if Arc::ptr_eq(previous, &concrete)
                );
                if !reused {
                    self.state.edges.insert(concrete_key.clone(), fresh_edges);
                }
                self.state.objects.insert(concrete_key, concrete);
            }
        }
    }
}
