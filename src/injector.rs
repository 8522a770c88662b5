//! The public wiring facade.
//!
//! [`Injector`] is a cheap cloneable handle on a named context. Configuration
//! calls are fluent; session-opening calls (`make_beans`, `start`, `stop`)
//! return `WiringResult<&Self>` for `?`-chaining.

use std::io::{self, Write};
use std::sync::{Arc, MutexGuard};

use crate::context::{AnyArc, Constructed, ContextShared, ContextState, Hook};
use crate::dependency::{Implements, Wired};
use crate::error::{BoxError, WiringError, WiringResult};
use crate::key::Key;
use crate::lifecycle::{self, Lifecycle};
use crate::logging::{loc, LogSink, StopWatch};
use crate::registry;
use crate::tree;
use crate::wiring::WiringSession;

/// A named injection context.
///
/// "Singletons" refer to single instances within one context; with multiple
/// contexts each holds its own instance of a given type.
///
/// # Examples
///
/// ```rust
/// use wireup::{BoxError, Dependency, Injector, Wired, WiringSession};
///
/// #[derive(Default)]
/// struct Service;
///
/// impl Service {
///     fn hello(&self) -> &'static str {
///         "hello"
///     }
/// }
///
/// impl Wired for Service {
///     fn wire(_: &mut WiringSession<'_>) -> Result<Self, BoxError> {
///         Ok(Service::default())
///     }
/// }
///
/// struct App {
///     service: Dependency<Service>,
/// }
///
/// impl Wired for App {
///     fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError> {
///         Ok(App { service: Dependency::new(wiring)? })
///     }
/// }
///
/// # fn main() -> wireup::WiringResult<()> {
/// let injector = Injector::context("docs-injector");
/// injector.make_beans::<App>()?;
///
/// let app = injector.get_bean::<App>().unwrap();
/// assert_eq!(app.service.get().hello(), "hello");
/// injector.remove();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Injector {
    shared: Arc<ContextShared>,
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("name", &self.shared.name)
            .finish_non_exhaustive()
    }
}

impl Injector {
    /// Retrieves the named context, creating an empty one if needed.
    pub fn context(name: &str) -> Injector {
        Injector {
            shared: registry::get_or_create(name),
        }
    }

    /// Sorted snapshot of the currently registered context names.
    pub fn names() -> Vec<String> {
        registry::names()
    }

    /// Clears the whole registry, for teardown between independent scenarios.
    /// Existing handles keep working against their detached contexts.
    pub fn remove_all() {
        registry::remove_all();
    }

    /// This context's name.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Detaches this context from the registry. The handle (and any clone of
    /// it) stays fully usable; a later [`Injector::context`] call with the
    /// same name creates a fresh, empty context.
    pub fn remove(&self) -> &Self {
        registry::remove(&self.shared.name);
        self
    }

    /// Installs or clears the log sink. `None` disables logging entirely;
    /// message-producing closures are then never invoked.
    pub fn set_logger(&self, sink: Option<Arc<dyn LogSink>>) -> &Self {
        *self.shared.logger.lock().unwrap() = sink;
        self
    }

    // ----- Configuration -----
    //
    // Definition calls briefly lock the context state and must not be invoked
    // from inside a construction supplier.

    /// Registers a construction supplier for the concrete type `T`, replacing
    /// its [`Wired::wire`] default path.
    pub fn define_construction<T, F>(&self, construct: F) -> &Self
    where
        T: Send + Sync + 'static,
        F: Fn(&mut WiringSession<'_>) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let ctor = move |session: &mut WiringSession<'_>| -> Result<Constructed, BoxError> {
            let value = construct(session)?;
            Ok(Constructed {
                primary: Arc::new(value) as AnyArc,
                concrete: None,
            })
        };
        self.state().constructions.insert(Key::of::<T>(), Arc::new(ctor));
        self
    }

    /// Registers a construction supplier for the service trait `S`, backed by
    /// the concrete implementation `T`. The constructed bean is stored under
    /// both keys, so lookups by either the trait or the implementation type
    /// yield the same instance.
    ///
    /// The supplier returns `Arc<T>`, which also allows handing out an
    /// already-constructed instance under a second trait.
    pub fn define_trait_construction<S, T, F>(&self, construct: F) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
        T: Implements<S>,
        F: Fn(&mut WiringSession<'_>) -> Result<Arc<T>, BoxError> + Send + Sync + 'static,
    {
        let ctor = move |session: &mut WiringSession<'_>| -> Result<Constructed, BoxError> {
            let value = construct(session)?;
            let service: Arc<S> = value.clone().into_service();
            Ok(Constructed {
                primary: Arc::new(service) as AnyArc,
                concrete: Some((Key::of::<T>(), value as AnyArc)),
            })
        };
        self.state()
            .constructions
            .insert(Key::of_trait::<S>(), Arc::new(ctor));
        self
    }

    /// Registers a start callback for the concrete type `T`.
    pub fn define_start<T, F>(&self, start: F) -> &Self
    where
        T: Send + Sync + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.state().start_table.insert(Key::of::<T>(), concrete_hook(start));
        self
    }

    /// Registers a stop callback for the concrete type `T`.
    pub fn define_stop<T, F>(&self, stop: F) -> &Self
    where
        T: Send + Sync + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.state().stop_table.insert(Key::of::<T>(), concrete_hook(stop));
        self
    }

    /// Registers start and stop callbacks for the concrete type `T`.
    pub fn define_start_stop<T, FStart, FStop>(&self, start: FStart, stop: FStop) -> &Self
    where
        T: Send + Sync + 'static,
        FStart: Fn(&T) + Send + Sync + 'static,
        FStop: Fn(&T) + Send + Sync + 'static,
    {
        let mut state = self.state();
        state.start_table.insert(Key::of::<T>(), concrete_hook(start));
        state.stop_table.insert(Key::of::<T>(), concrete_hook(stop));
        self
    }

    /// Registers a start callback keyed by the service trait `S`, for beans
    /// wired through [`Injector::define_trait_construction`].
    pub fn define_trait_start<S, F>(&self, start: F) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.state().start_table.insert(Key::of_trait::<S>(), trait_hook(start));
        self
    }

    /// Registers a stop callback keyed by the service trait `S`.
    pub fn define_trait_stop<S, F>(&self, stop: F) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.state().stop_table.insert(Key::of_trait::<S>(), trait_hook(stop));
        self
    }

    /// Bridges `T`'s own [`Lifecycle`] implementation into the start/stop
    /// tables. Equivalent to registering `T::start` and `T::stop` as
    /// callbacks; a later per-type callback registration replaces it.
    pub fn define_lifecycle<T>(&self) -> &Self
    where
        T: Lifecycle + Send + Sync + 'static,
    {
        let mut state = self.state();
        state
            .start_table
            .insert(Key::of::<T>(), concrete_hook(|bean: &T| bean.start()));
        state
            .stop_table
            .insert(Key::of::<T>(), concrete_hook(|bean: &T| bean.stop()));
        self
    }

    // ----- Wiring -----

    /// Wires the object graph rooted at the concrete type `T`: creates `T`
    /// (via supplier or [`Wired::wire`]), which recursively creates every
    /// declared dependency, memoized to one instance per type. On success `T`
    /// becomes a lifecycle root; re-registering the same root is a no-op.
    pub fn make_beans<T: Wired>(&self) -> WiringResult<&Self> {
        self.run_session(Key::of::<T>(), |session: &mut WiringSession<'_>| {
            session.resolve_concrete::<T>().map(|_| ())
        })
    }

    /// Wires the object graph rooted at the service trait `S`, which must
    /// have a registered construction supplier.
    pub fn make_beans_trait<S: ?Sized + Send + Sync + 'static>(&self) -> WiringResult<&Self> {
        self.run_session(Key::of_trait::<S>(), |session: &mut WiringSession<'_>| {
            session.resolve_trait::<S>().map(|_| ())
        })
    }

    fn run_session(
        &self,
        root: Key,
        resolve: impl FnOnce(&mut WiringSession<'_>) -> Result<(), BoxError>,
    ) -> WiringResult<&Self> {
        let root_name = root.display_name();
        let mut state = self.lock_session()?;
        self.shared
            .log_info(loc!(), || format!("Make beans for dependent {} ...", root_name));
        let watch = StopWatch::start();
        let result = {
            let mut session = WiringSession::new(&self.shared, &mut state);
            resolve(&mut session)
        };
        match result {
            Ok(()) => {
                if !state.roots.contains(&root) {
                    state.roots.push(root);
                }
                self.shared
                    .log_info(loc!(), || format!("Make beans finished in {}ms.", watch.millis()));
                Ok(self)
            }
            Err(e) => {
                let err = WiringError::from_make_beans(root_name, e);
                self.shared.log_error(loc!(), Some(&err), || {
                    format!("Make beans for dependent {} failed.", root_name)
                });
                Err(err)
            }
        }
    }

    // ----- Lifecycle -----

    /// Starts all beans reachable from the roots, dependencies before
    /// dependents, each at most once until the next [`Injector::stop`].
    /// Fails with [`WiringError::NoRootsDefined`] before any `make_beans`.
    pub fn start(&self) -> WiringResult<&Self> {
        let mut state = self.lock_session()?;
        self.shared.log_info(loc!(), || "Start beans...".to_string());
        let watch = StopWatch::start();
        lifecycle::start_all(&self.shared, &mut state)?;
        self.shared
            .log_info(loc!(), || format!("Start beans finished in {}ms.", watch.millis()));
        Ok(self)
    }

    /// Stops all beans reachable from the roots, dependents before
    /// dependencies, each at most once until the next [`Injector::start`].
    /// With no roots this is a no-op.
    pub fn stop(&self) -> WiringResult<&Self> {
        let mut state = self.lock_session()?;
        self.shared.log_info(loc!(), || "Stop beans...".to_string());
        let watch = StopWatch::start();
        lifecycle::stop_all(&self.shared, &mut state);
        self.shared
            .log_info(loc!(), || format!("Stop beans finished in {}ms.", watch.millis()));
        Ok(self)
    }

    // ----- Lookup -----

    /// Pure lookup of a wired bean by its concrete type. `None` if never
    /// constructed, or while a wiring session is active (use
    /// [`WiringSession::get_bean`] from inside suppliers).
    pub fn get_bean<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let state = self.shared.state.try_lock().ok()?;
        let any = state.objects.get(&Key::of::<T>())?.clone();
        any.downcast::<T>().ok()
    }

    /// Pure lookup of a wired bean by its service trait.
    pub fn get_trait_bean<S: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<S>> {
        let state = self.shared.state.try_lock().ok()?;
        state
            .objects
            .get(&Key::of_trait::<S>())?
            .downcast_ref::<Arc<S>>()
            .cloned()
    }

    // ----- Diagnostics -----

    /// Renders the dependency tree of every root into `out`.
    pub fn print<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self.shared.state.try_lock() {
            Ok(state) => tree::render(&state, out),
            Err(_) => Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "wiring session active",
            )),
        }
    }

    /// Renders the dependency tree to standard output.
    pub fn print_stdout(&self) -> io::Result<()> {
        self.print(&mut io::stdout().lock())
    }

    fn state(&self) -> MutexGuard<'_, ContextState> {
        self.shared.state.lock().unwrap()
    }

    /// Takes the context's exclusive session lock; a second wiring or
    /// lifecycle session on the same context fails fast instead of running
    /// interleaved over single-writer state.
    fn lock_session(&self) -> WiringResult<MutexGuard<'_, ContextState>> {
        self.shared.state.try_lock().map_err(|_| WiringError::ContextMismatch {
            context: self.shared.name.clone(),
        })
    }
}

fn concrete_hook<T: Send + Sync + 'static>(hook: impl Fn(&T) + Send + Sync + 'static) -> Hook {
    Arc::new(move |any: &AnyArc| {
        if let Some(bean) = any.downcast_ref::<T>() {
            hook(bean);
        }
    })
}

fn trait_hook<S: ?Sized + Send + Sync + 'static>(
    hook: impl Fn(&S) + Send + Sync + 'static,
) -> Hook {
    Arc::new(move |any: &AnyArc| {
        if let Some(service) = any.downcast_ref::<Arc<S>>() {
            hook(service);
        }
    })
}
