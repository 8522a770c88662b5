use proptest::prelude::*;
use wireup::{BoxError, Injector, Wired, WiringSession};

#[derive(Default)]
struct Probe;

impl Wired for Probe {
    fn wire(_: &mut WiringSession<'_>) -> Result<Self, BoxError> {
        Ok(Probe)
    }
}

proptest! {
    #[test]
    fn registry_round_trip(name in "[a-z]{1,12}") {
        let scoped = format!("prop-rt-{name}");
        let injector = Injector::context(&scoped);
        prop_assert!(Injector::names().contains(&scoped));
        prop_assert_eq!(injector.name(), scoped.as_str());

        injector.remove();
        prop_assert!(!Injector::names().contains(&scoped));
    }

    #[test]
    fn removal_yields_fresh_context(name in "[a-z]{1,12}") {
        let scoped = format!("prop-fresh-{name}");
        let injector = Injector::context(&scoped);
        prop_assert!(injector.make_beans::<Probe>().is_ok());
        prop_assert!(injector.get_bean::<Probe>().is_some());

        injector.remove();

        let fresh = Injector::context(&scoped);
        prop_assert!(fresh.get_bean::<Probe>().is_none());
        // The detached handle still answers with the old instance
        prop_assert!(injector.get_bean::<Probe>().is_some());
        fresh.remove();
    }

    #[test]
    fn get_or_create_is_idempotent(name in "[a-z]{1,12}", repeats in 1usize..5) {
        let scoped = format!("prop-idem-{name}");
        Injector::context(&scoped).make_beans::<Probe>().unwrap();
        let first = Injector::context(&scoped).get_bean::<Probe>().unwrap();

        for _ in 0..repeats {
            let again = Injector::context(&scoped).get_bean::<Probe>().unwrap();
            prop_assert!(std::sync::Arc::ptr_eq(&first, &again));
        }
        Injector::context(&scoped).remove();
    }
}
