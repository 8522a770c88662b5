//! Type identity tokens for the wiring engine.

use std::any::TypeId;

/// Key for bean storage and lookup.
///
/// Keys uniquely identify declared service types within a context. Concrete
/// types are keyed by their `TypeId`; service traits (which have no `TypeId`
/// of their own) are keyed by their type name. The engine never needs runtime
/// reflection beyond these tokens: every map in a context (object store,
/// supplier table, start/stop tables, pending set, dependency edges) is keyed
/// by `Key`.
///
/// # Examples
///
/// ```rust
/// use wireup::Key;
///
/// struct Database;
/// trait Repository {}
///
/// let concrete = Key::of::<Database>();
/// let service = Key::of_trait::<dyn Repository>();
///
/// assert_eq!(concrete, Key::of::<Database>());
/// assert_ne!(concrete, service);
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// Concrete type key with TypeId and name for diagnostics
    Type(TypeId, &'static str),
    /// Service trait key, identified by the trait's type name
    Trait(&'static str),
}

impl Key {
    /// Key of a concrete type.
    pub fn of<T: 'static>() -> Key {
        Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// Key of a service trait, e.g. `Key::of_trait::<dyn Repository>()`.
    pub fn of_trait<T: ?Sized + 'static>() -> Key {
        Key::Trait(std::any::type_name::<T>())
    }

    /// The full type or trait name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::Trait(name) => name,
        }
    }

    /// Last path segment of the name, used by the tree renderer.
    pub(crate) fn short_name(&self) -> &'static str {
        let name = self.display_name();
        name.rsplit("::").next().unwrap_or(name)
    }
}

// Equality on the hot path compares TypeId only; the name is diagnostics.
impl PartialEq for Key {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Trait(a), Key::Trait(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Trait(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}
