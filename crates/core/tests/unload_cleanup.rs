//! Owner-scoped cleanup when a resolver is stopped

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use unitloader_api::{
    BoxError, Lifecycle, LifecycleState, ResolverScope, UnitId, UnitSource,
};
use unitloader_core::HostRegistries;
use unitloader_core::UnitResolver;
use unitloader_core::cleanup::Driver;

struct EmptyUnit(UnitId);

impl UnitSource for EmptyUnit {
    fn id(&self) -> &UnitId {
        &self.0
    }

    fn classpath_header(&self) -> Option<String> {
        None
    }

    fn entry_location(&self, _entry: &str) -> Option<String> {
        None
    }

    fn primary_scope(&self) -> Option<Arc<dyn ResolverScope>> {
        None
    }
}

struct TestDriver {
    name: String,
    fail: bool,
    deregistered: AtomicUsize,
}

impl TestDriver {
    fn new(name: &str, fail: bool) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fail,
            deregistered: AtomicUsize::new(0),
        })
    }
}

impl Driver for TestDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn deregister(&self) -> Result<(), BoxError> {
        self.deregistered.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err("driver still in use".into());
        }
        Ok(())
    }
}

fn resolver(registries: &HostRegistries, id: &str) -> UnitResolver {
    UnitResolver::builder(Arc::new(EmptyUnit(UnitId::new(id))))
        .with_cleanup(Arc::new(registries.cleanup_registry()))
        .build()
}

#[test]
fn test_stop_releases_only_own_registrations() {
    let registries = HostRegistries::new();
    let shop = resolver(&registries, "shop");
    let other = resolver(&registries, "other");

    let shop_driver = TestDriver::new("shop-db", false);
    let other_driver = TestDriver::new("other-db", false);
    registries.drivers.register(shop.owner_id(), shop_driver.clone());
    registries.drivers.register(other.owner_id(), other_driver.clone());
    registries.logging.bind(shop.owner_id(), "com.shop.Cart");
    registries.logging.bind(other.owner_id(), "com.other.Thing");
    registries
        .introspection
        .describe("com.shop.Cart", || vec!["items".to_string()]);

    shop.init();
    shop.start();
    let report = shop.stop_with_report();

    assert!(report.is_clean());
    assert_eq!(report.steps_run(), 3);
    assert_eq!(shop_driver.deregistered.load(Ordering::SeqCst), 1);
    assert_eq!(other_driver.deregistered.load(Ordering::SeqCst), 0);
    assert_eq!(registries.drivers.driver_names(), vec!["other-db".to_string()]);
    assert!(registries.logging.bindings_for(shop.owner_id()).is_empty());
    assert_eq!(registries.logging.bindings_for(other.owner_id()).len(), 1);
    assert!(registries.introspection.is_empty());
}

#[test]
fn test_failing_step_does_not_block_the_rest() {
    let registries = HostRegistries::new();
    let shop = resolver(&registries, "shop");

    let stuck = TestDriver::new("stuck-db", true);
    let fine = TestDriver::new("fine-db", false);
    registries.drivers.register(shop.owner_id(), stuck.clone());
    registries.drivers.register(shop.owner_id(), fine.clone());
    registries.logging.bind(shop.owner_id(), "com.shop.Cart");

    shop.start();
    let report = shop.stop_with_report();

    assert!(!report.is_clean());
    assert_eq!(report.failed_hooks(), vec!["drivers"]);
    assert_eq!(report.steps_run(), 3);
    assert_eq!(fine.deregistered.load(Ordering::SeqCst), 1);
    assert_eq!(registries.drivers.count_for(shop.owner_id()), 1);
    assert!(registries.logging.bindings_for(shop.owner_id()).is_empty());
    assert_eq!(shop.state(), LifecycleState::Stopped);

    // The stuck driver is retried on the next stop
    shop.stop();
    assert_eq!(stuck.deregistered.load(Ordering::SeqCst), 2);

    shop.destroy();
    assert_eq!(shop.state(), LifecycleState::Destroyed);
}
