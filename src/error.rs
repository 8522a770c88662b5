//! Error types for the wiring engine.

use std::error::Error;
use std::fmt;

/// Boxed error used at the construction-supplier boundary.
///
/// Suppliers and [`Wired::wire`](crate::Wired::wire) return `Result<_, BoxError>`
/// so that `?` works both for the engine's own [`WiringError`] kinds and for
/// arbitrary user failures. The engine inspects boxed errors at each wrapping
/// boundary: recognized wiring errors pass through unchanged, anything else is
/// wrapped exactly once.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Wiring errors
///
/// The specific kinds (`OutOfContext`, `ContextMismatch`, `CyclicDependency`,
/// `ConstructionMissing`, `DependencyCreation`) are never re-wrapped as they
/// propagate up through nested constructions, so callers can match on them
/// regardless of nesting depth. Unrecognized failures are wrapped exactly once:
/// as `DependencyCreation` where a dependency handle failed, or as `MakeBeans`
/// at the top-level [`Injector::make_beans`](crate::Injector::make_beans)
/// boundary.
#[derive(Debug)]
pub enum WiringError {
    /// A dependency handle was created while no entity construction was in
    /// progress in the session
    OutOfContext {
        /// Declared target type of the handle
        target: &'static str,
    },
    /// A wiring or lifecycle session was opened on a context that already has
    /// one active
    ContextMismatch {
        /// Name of the contended context
        context: String,
    },
    /// Construction re-entered a type still in its pending set (includes the
    /// construction path, last element closing the cycle)
    CyclicDependency {
        /// Construction path, e.g. `["A", "B", "A"]`
        path: Vec<&'static str>,
    },
    /// A service trait has no registered construction supplier
    ConstructionMissing {
        /// The trait that could not be constructed
        target: &'static str,
    },
    /// An unrecognized failure was raised while resolving a dependency handle
    DependencyCreation {
        /// The entity that declared the handle
        dependent: &'static str,
        /// The declared target type
        target: &'static str,
        /// The underlying failure
        source: BoxError,
    },
    /// An unrecognized failure surfaced at the top-level `make_beans` boundary
    MakeBeans {
        /// The root type being wired
        root: &'static str,
        /// The underlying failure
        source: BoxError,
    },
    /// `start()` was called before any `make_beans()` established a root
    NoRootsDefined,
}

impl fmt::Display for WiringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WiringError::OutOfContext { target } => {
                write!(f, "dependency to '{}' created outside of a wiring session", target)
            }
            WiringError::ContextMismatch { context } => {
                write!(
                    f,
                    "context '{}' already has an active wiring or lifecycle session",
                    context
                )
            }
            WiringError::CyclicDependency { path } => {
                write!(f, "cyclic dependency: {}", path.join(" -> "))
            }
            WiringError::ConstructionMissing { target } => {
                write!(
                    f,
                    "construction needed for service trait '{}', use Injector::define_trait_construction(..)",
                    target
                )
            }
            WiringError::DependencyCreation { dependent, target, source } => {
                write!(f, "creating dependency {} -> {} failed: {}", dependent, target, source)
            }
            WiringError::MakeBeans { root, source } => {
                write!(f, "make beans for root '{}' failed: {}", root, source)
            }
            WiringError::NoRootsDefined => {
                write!(f, "no beans made yet, see Injector::make_beans(..)")
            }
        }
    }
}

impl Error for WiringError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WiringError::DependencyCreation { source, .. } => Some(source.as_ref()),
            WiringError::MakeBeans { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl WiringError {
    /// Classifies a failure at a dependency-handle boundary: recognized wiring
    /// errors pass through, everything else is wrapped as `DependencyCreation`.
    pub(crate) fn from_dependency(
        dependent: &'static str,
        target: &'static str,
        error: BoxError,
    ) -> WiringError {
        match error.downcast::<WiringError>() {
            Ok(known) => *known,
            Err(other) => WiringError::DependencyCreation {
                dependent,
                target,
                source: other,
            },
        }
    }

    /// Classifies a failure at the top-level `make_beans` boundary.
    pub(crate) fn from_make_beans(root: &'static str, error: BoxError) -> WiringError {
        match error.downcast::<WiringError>() {
            Ok(known) => *known,
            Err(other) => WiringError::MakeBeans { root, source: other },
        }
    }
}

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

// Guards the object-store invariant that the value stored under a key is of
// the key's type. Surfaces as DependencyCreation/MakeBeans if ever violated.
#[derive(Debug)]
pub(crate) struct StoredTypeMismatch(pub(crate) &'static str);

impl fmt::Display for StoredTypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stored bean for '{}' does not match the requested type", self.0)
    }
}

impl Error for StoredTypeMismatch {}
