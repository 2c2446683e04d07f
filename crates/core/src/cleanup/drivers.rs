use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};
use unitloader_api::{BoxError, CleanupError, CleanupHook, OwnerId};

/// A driver-like external resource registered by code a resolver loaded.
pub trait Driver: Send + Sync {
    fn name(&self) -> &str;

    /// Called when the driver is removed from the registry.
    fn deregister(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

struct Registration {
    owner: OwnerId,
    driver: Arc<dyn Driver>,
}

/// Process-wide driver registry. Stopping a resolver deregisters the
/// drivers it owns; a driver that fails to deregister stays registered.
#[derive(Default)]
pub struct DriverRegistry {
    drivers: RwLock<Vec<Registration>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, owner: OwnerId, driver: Arc<dyn Driver>) {
        debug!("Registering driver {} for {}", driver.name(), owner);
        self.drivers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Registration { owner, driver });
    }

    pub fn driver_names(&self) -> Vec<String> {
        self.drivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|r| r.driver.name().to_string())
            .collect()
    }

    pub fn count_for(&self, owner: OwnerId) -> usize {
        self.drivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.owner == owner)
            .count()
    }
}

impl CleanupHook for DriverRegistry {
    fn name(&self) -> &str {
        "drivers"
    }

    fn release_for(&self, owner: OwnerId) -> Result<(), CleanupError> {
        // Deregistration runs unlocked; the registry is pruned afterwards
        let owned: Vec<Arc<dyn Driver>> = self
            .drivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.owner == owner)
            .map(|r| r.driver.clone())
            .collect();

        let attempted = owned.len();
        let mut released = Vec::with_capacity(attempted);
        for driver in owned {
            match driver.deregister() {
                Ok(()) => {
                    debug!("Deregistered driver {}", driver.name());
                    released.push(driver);
                }
                Err(e) => warn!("Driver deregistration failed for {}: {}", driver.name(), e),
            }
        }

        // Drivers that failed keep their registration order
        self.drivers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|r| r.owner != owner || !released.iter().any(|d| Arc::ptr_eq(d, &r.driver)));

        let failed = attempted - released.len();
        if failed == 0 {
            return Ok(());
        }
        Err(CleanupError::Partial {
            hook: self.name().to_string(),
            failed,
            attempted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestDriver {
        name: &'static str,
        fail: bool,
    }

    impl Driver for TestDriver {
        fn name(&self) -> &str {
            self.name
        }

        fn deregister(&self) -> Result<(), BoxError> {
            if self.fail {
                Err("driver busy".into())
            } else {
                Ok(())
            }
        }
    }

    fn driver(name: &'static str, fail: bool) -> Arc<dyn Driver> {
        Arc::new(TestDriver { name, fail })
    }

    #[test]
    fn test_release_only_owned_drivers() {
        let registry = DriverRegistry::new();
        let mine = OwnerId::next();
        let other = OwnerId::next();
        registry.register(mine, driver("h2", false));
        registry.register(other, driver("postgres", false));

        registry.release_for(mine).unwrap();

        assert_eq!(registry.count_for(mine), 0);
        assert_eq!(registry.driver_names(), vec!["postgres".to_string()]);
    }

    #[test]
    fn test_failed_deregistration_keeps_going() {
        let registry = DriverRegistry::new();
        let owner = OwnerId::next();
        registry.register(owner, driver("stuck", true));
        registry.register(owner, driver("fine", false));

        let err = registry.release_for(owner).unwrap_err();
        assert_eq!(
            err,
            CleanupError::Partial {
                hook: "drivers".to_string(),
                failed: 1,
                attempted: 2,
            }
        );
        assert_eq!(registry.driver_names(), vec!["stuck".to_string()]);
    }

    #[test]
    fn test_release_is_idempotent() {
        let registry = DriverRegistry::new();
        let owner = OwnerId::next();
        registry.register(owner, driver("h2", false));

        registry.release_for(owner).unwrap();
        registry.release_for(owner).unwrap();
        assert!(registry.driver_names().is_empty());
    }

    #[test]
    fn test_failed_drivers_keep_their_position() {
        let registry = DriverRegistry::new();
        let owner = OwnerId::next();
        let other = OwnerId::next();
        registry.register(owner, driver("stuck-a", true));
        registry.register(other, driver("postgres", false));
        registry.register(owner, driver("fine", false));
        registry.register(owner, driver("stuck-b", true));
        registry.register(other, driver("mysql", false));

        let expected: Vec<String> = ["stuck-a", "postgres", "stuck-b", "mysql"]
            .iter()
            .map(|n| n.to_string())
            .collect();

        assert!(registry.release_for(owner).is_err());
        assert_eq!(registry.driver_names(), expected);

        let err = registry.release_for(owner).unwrap_err();
        assert_eq!(
            err,
            CleanupError::Partial {
                hook: "drivers".to_string(),
                failed: 2,
                attempted: 2,
            }
        );
        assert_eq!(registry.driver_names(), expected);
    }
}
