//! # wireup
//!
//! Context-scoped dependency wiring with start/stop lifecycle management.
//!
//! ## Features
//!
//! - **Named contexts**: isolated object graphs addressed by name, with one
//!   singleton instance per type per context
//! - **Recursive wiring**: beans declare their dependencies as typed
//!   [`Dependency`] handles that resolve on construction, memoized across the
//!   graph
//! - **Cycle detection**: construction that re-enters a type still being
//!   built fails with the full dependency path
//! - **Trait resolution**: a supplier registered for a service trait makes
//!   the bean reachable by both the trait and its concrete type
//! - **Lifecycle traversal**: ordered `start` (dependencies first) and `stop`
//!   (dependents first) with idempotent re-entry guards
//!
//! ## Quick Start
//!
//! ```rust
//! use wireup::{BoxError, Dependency, Injector, Wired, WiringSession};
//!
//! // Define your beans
//! #[derive(Default)]
//! struct Greeter;
//!
//! impl Greeter {
//!     fn hello(&self) -> &'static str {
//!         "hello"
//!     }
//! }
//!
//! impl Wired for Greeter {
//!     fn wire(_: &mut WiringSession<'_>) -> Result<Self, BoxError> {
//!         Ok(Greeter::default())
//!     }
//! }
//!
//! struct App {
//!     greeter: Dependency<Greeter>,
//! }
//!
//! impl Wired for App {
//!     fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError> {
//!         Ok(App { greeter: Dependency::new(wiring)? })
//!     }
//! }
//!
//! # fn main() -> wireup::WiringResult<()> {
//! // Wire and use the graph
//! let injector = Injector::context("quickstart");
//! injector.make_beans::<App>()?;
//!
//! let app = injector.get_bean::<App>().unwrap();
//! assert_eq!(app.greeter.get().hello(), "hello");
//!
//! // The same instance answers repeated lookups
//! let greeter = injector.get_bean::<Greeter>().unwrap();
//! assert!(std::sync::Arc::ptr_eq(&greeter, &app.greeter.get_shared()));
//! injector.remove();
//! # Ok(())
//! # }
//! ```
//!
//! ## Service Traits
//!
//! ```rust
//! use wireup::{BoxError, Implements, Injector};
//! use std::sync::Arc;
//!
//! trait Storage: Send + Sync {
//!     fn put(&self, value: &str) -> String;
//! }
//!
//! struct MemoryStorage;
//!
//! impl Storage for MemoryStorage {
//!     fn put(&self, value: &str) -> String {
//!         format!("stored {}", value)
//!     }
//! }
//!
//! impl Implements<dyn Storage> for MemoryStorage {
//!     fn into_service(self: Arc<Self>) -> Arc<dyn Storage> {
//!         self
//!     }
//! }
//!
//! # fn main() -> wireup::WiringResult<()> {
//! let injector = Injector::context("storage-docs");
//! injector.define_trait_construction::<dyn Storage, MemoryStorage, _>(|_| {
//!     Ok(Arc::new(MemoryStorage))
//! });
//! injector.make_beans_trait::<dyn Storage>()?;
//!
//! // Reachable by trait and by concrete type, one instance
//! let by_trait = injector.get_trait_bean::<dyn Storage>().unwrap();
//! let by_type = injector.get_bean::<MemoryStorage>().unwrap();
//! assert_eq!(by_trait.put("x"), "stored x");
//! assert_eq!(by_type.put("x"), "stored x");
//! injector.remove();
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod dependency;
pub mod error;
pub mod injector;
pub mod key;
pub mod lifecycle;
pub mod logging;
pub mod wiring;

// Internal modules
mod context;
mod registry;
mod tree;

// Re-export core types
pub use dependency::{Dependency, Implements, Wired};
pub use error::{BoxError, WiringError, WiringResult};
pub use injector::Injector;
pub use key::Key;
pub use lifecycle::Lifecycle;
pub use logging::{LogSink, WriterSink};
pub use wiring::WiringSession;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Default)]
    struct Leaf;

    impl Wired for Leaf {
        fn wire(_: &mut WiringSession<'_>) -> Result<Self, BoxError> {
            Ok(Leaf)
        }
    }

    struct Holder {
        leaf: Dependency<Leaf>,
    }

    impl Wired for Holder {
        fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError> {
            Ok(Holder {
                leaf: Dependency::new(wiring)?,
            })
        }
    }

    #[test]
    fn test_singleton_per_context() {
        let injector = Injector::context("lib-singleton");
        injector.make_beans::<Holder>().unwrap();

        let holder = injector.get_bean::<Holder>().unwrap();
        let leaf = injector.get_bean::<Leaf>().unwrap();
        assert!(Arc::ptr_eq(&leaf, &holder.leaf.get_shared()));

        injector.remove();
    }

    #[test]
    fn test_duplicate_root_is_noop() {
        let injector = Injector::context("lib-duplicate-root");
        injector.make_beans::<Holder>().unwrap();
        let first = injector.get_bean::<Holder>().unwrap();

        injector.make_beans::<Holder>().unwrap();
        let second = injector.get_bean::<Holder>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        injector.remove();
    }
}
