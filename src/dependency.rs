//! Dependency handles and the construction contracts of wired types.

use std::sync::Arc;

use crate::error::{BoxError, WiringError, WiringResult};
use crate::key::Key;
use crate::wiring::WiringSession;

/// A type the engine can construct without a registered supplier.
///
/// `wire` is the statically known construction path of a concrete bean type:
/// it replaces the reflective zero-argument constructor of classic containers.
/// Types with dependencies declare them by creating [`Dependency`] handles
/// from the session; leaf types simply build themselves.
///
/// # Examples
///
/// ```rust
/// use wireup::{BoxError, Dependency, Wired, WiringSession};
///
/// #[derive(Default)]
/// struct Engine;
///
/// impl Wired for Engine {
///     fn wire(_: &mut WiringSession<'_>) -> Result<Self, BoxError> {
///         Ok(Engine::default())
///     }
/// }
///
/// struct Car {
///     engine: Dependency<Engine>,
/// }
///
/// impl Wired for Car {
///     fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError> {
///         Ok(Car { engine: Dependency::new(wiring)? })
///     }
/// }
/// ```
pub trait Wired: Sized + Send + Sync + 'static {
    /// Constructs the value, declaring its dependencies against the session.
    fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError>;
}

/// Marks `Self` as an implementation of the service trait `S`.
///
/// The engine stores trait-supplied beans under both the trait key and the
/// concrete key; this trait provides the unsizing step it cannot perform
/// generically. The implementation is always one line.
///
/// # Examples
///
/// ```rust
/// use wireup::Implements;
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct ConsoleGreeter;
///
/// impl Greeter for ConsoleGreeter {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// impl Implements<dyn Greeter> for ConsoleGreeter {
///     fn into_service(self: Arc<Self>) -> Arc<dyn Greeter> {
///         self
///     }
/// }
/// ```
pub trait Implements<S: ?Sized + Send + Sync + 'static>: Send + Sync + 'static {
    /// Unsizes the shared instance into its service trait.
    fn into_service(self: Arc<Self>) -> Arc<S>;
}

/// A typed dependency slot owned by the dependent entity.
///
/// Creating a handle inside [`Wired::wire`] or a construction supplier
/// registers the dependency edge with the engine and resolves the target
/// through the engine's get-or-create, recursively wiring the target's own
/// dependencies first. A handle value only exists fully resolved: failed
/// resolution returns the error instead of a handle.
///
/// ```text
/// A -> B
///
/// struct A { b: Dependency<B> }
/// ```
pub struct Dependency<T: ?Sized + Send + Sync + 'static> {
    declared: Key,
    target: Arc<T>,
}

impl<T: ?Sized + Send + Sync + 'static> std::fmt::Debug for Dependency<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dependency")
            .field("declared", &self.declared)
            .finish_non_exhaustive()
    }
}

impl<T: Wired> Dependency<T> {
    /// Declares and resolves a dependency on the concrete type `T`.
    pub fn new(wiring: &mut WiringSession<'_>) -> WiringResult<Self> {
        Self::resolve(wiring, Key::of::<T>(), |session: &mut WiringSession<'_>| {
            session.resolve_concrete::<T>()
        })
    }
}

impl<T: ?Sized + Send + Sync + 'static> Dependency<T> {
    /// Declares and resolves a dependency on the service trait `T`, e.g.
    /// `Dependency::<dyn Repository>::new_trait(wiring)`. The trait must have
    /// a registered construction supplier.
    pub fn new_trait(wiring: &mut WiringSession<'_>) -> WiringResult<Self> {
        Self::resolve(wiring, Key::of_trait::<T>(), |session: &mut WiringSession<'_>| {
            session.resolve_trait::<T>()
        })
    }

    fn resolve(
        wiring: &mut WiringSession<'_>,
        declared: Key,
        target_of: impl FnOnce(&mut WiringSession<'_>) -> Result<Arc<T>, BoxError>,
    ) -> WiringResult<Self> {
        let owner = match wiring.current_dependent() {
            Some(owner) => owner,
            None => {
                return Err(WiringError::OutOfContext {
                    target: declared.display_name(),
                })
            }
        };
        // Register before resolving, so a failed resolution stays visible as
        // an unresolved edge.
        let slot = wiring.register_edge(&owner, declared.clone());
        match target_of(wiring) {
            Ok(target) => {
                let resolved = wiring.resolved_key(&declared);
                wiring.resolve_edge(&owner, slot, resolved);
                wiring.log_injected(owner.display_name(), declared.display_name());
                Ok(Dependency { declared, target })
            }
            Err(e) => Err(WiringError::from_dependency(
                owner.display_name(),
                declared.display_name(),
                e,
            )),
        }
    }

    /// Borrows the resolved target.
    pub fn get(&self) -> &T {
        &self.target
    }

    /// Clones the shared reference to the resolved target.
    pub fn get_shared(&self) -> Arc<T> {
        self.target.clone()
    }

    /// Declared target type name.
    pub fn target_name(&self) -> &'static str {
        self.declared.display_name()
    }
}
