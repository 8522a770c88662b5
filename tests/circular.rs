use std::sync::Arc;

use wireup::{BoxError, Dependency, Injector, Wired, WiringError, WiringSession};

struct AtoB {
    _b: Dependency<BtoA>,
}

impl Wired for AtoB {
    fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError> {
        Ok(AtoB {
            _b: Dependency::new(wiring)?,
        })
    }
}

struct BtoA {
    _a: Dependency<AtoB>,
}

impl Wired for BtoA {
    fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError> {
        Ok(BtoA {
            _a: Dependency::new(wiring)?,
        })
    }
}

fn assert_cycle(err: WiringError, expected_tail: &[&str]) {
    match err {
        WiringError::CyclicDependency { path } => {
            assert_eq!(path.len(), expected_tail.len(), "path was {path:?}");
            for (full, short) in path.iter().zip(expected_tail) {
                assert!(full.ends_with(short), "expected {short} in path {path:?}");
            }
        }
        other => panic!("expected CyclicDependency, got {other}"),
    }
}

#[test]
fn test_bidirectional_dependency() {
    let injector = Injector::context("circular-bidirectional");
    let err = injector.make_beans::<AtoB>().unwrap_err();
    assert_cycle(err, &["AtoB", "BtoA", "AtoB"]);
    injector.remove();
}

struct X {
    _y: Dependency<Y>,
}

struct Y {
    _z: Dependency<Z>,
}

struct Z {
    _x: Dependency<X>,
}

impl Wired for X {
    fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError> {
        Ok(X {
            _y: Dependency::new(wiring)?,
        })
    }
}

impl Wired for Y {
    fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError> {
        Ok(Y {
            _z: Dependency::new(wiring)?,
        })
    }
}

impl Wired for Z {
    fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError> {
        Ok(Z {
            _x: Dependency::new(wiring)?,
        })
    }
}

#[test]
fn test_deep_cyclic_dependency() {
    let injector = Injector::context("circular-deep");
    let err = injector.make_beans::<X>().unwrap_err();
    assert_cycle(err, &["X", "Y", "Z", "X"]);
    injector.remove();
}

trait SvcA: Send + Sync {}
trait SvcB: Send + Sync {}

struct ImplA {
    _b: Dependency<dyn SvcB>,
}

struct ImplB {
    _a: Dependency<dyn SvcA>,
}

impl SvcA for ImplA {}
impl SvcB for ImplB {}

impl wireup::Implements<dyn SvcA> for ImplA {
    fn into_service(self: Arc<Self>) -> Arc<dyn SvcA> {
        self
    }
}

impl wireup::Implements<dyn SvcB> for ImplB {
    fn into_service(self: Arc<Self>) -> Arc<dyn SvcB> {
        self
    }
}

#[test]
fn test_bidirectional_dependency_with_service_traits() {
    let injector = Injector::context("circular-traits");
    injector.define_trait_construction::<dyn SvcA, ImplA, _>(|w| {
        Ok(Arc::new(ImplA {
            _b: Dependency::new_trait(w)?,
        }))
    });
    injector.define_trait_construction::<dyn SvcB, ImplB, _>(|w| {
        Ok(Arc::new(ImplB {
            _a: Dependency::new_trait(w)?,
        }))
    });

    let err = injector.make_beans_trait::<dyn SvcA>().unwrap_err();
    assert_cycle(err, &["SvcA", "SvcB", "SvcA"]);
    injector.remove();
}

#[derive(Default)]
struct Chain4;

struct Chain3 {
    _next: Dependency<Chain4>,
}

struct Chain2 {
    _next: Dependency<Chain3>,
}

struct Chain1 {
    _next: Dependency<Chain2>,
}

impl Wired for Chain4 {
    fn wire(_: &mut WiringSession<'_>) -> Result<Self, BoxError> {
        Ok(Chain4)
    }
}

impl Wired for Chain3 {
    fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError> {
        Ok(Chain3 {
            _next: Dependency::new(wiring)?,
        })
    }
}

impl Wired for Chain2 {
    fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError> {
        Ok(Chain2 {
            _next: Dependency::new(wiring)?,
        })
    }
}

impl Wired for Chain1 {
    fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError> {
        Ok(Chain1 {
            _next: Dependency::new(wiring)?,
        })
    }
}

#[test]
fn test_acyclic_chain_wires() {
    let injector = Injector::context("circular-acyclic-chain");
    injector.make_beans::<Chain1>().unwrap();
    assert!(injector.get_bean::<Chain4>().is_some());
    injector.remove();
}

#[test]
fn test_context_stays_usable_after_cycle_error() {
    let injector = Injector::context("circular-recovery");
    injector.make_beans::<AtoB>().unwrap_err();

    // The pending set was cleaned up, an unrelated graph still wires
    injector.make_beans::<Chain3>().unwrap();
    assert!(injector.get_bean::<Chain4>().is_some());
    injector.remove();
}
