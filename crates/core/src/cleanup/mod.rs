//! Owner-scoped cleanup run when a resolver stops.
//!
//! Collaborators that key state by resolver identity (driver registries,
//! introspection caches, logging bindings) register a [`CleanupHook`] with a
//! [`CleanupRegistry`]. The registry is an explicit object handed to each
//! resolver, never ambient global state. Every hook runs on every stop;
//! a failing hook is logged and the remaining hooks still run.

pub mod bindings;
pub mod drivers;
pub mod introspection;

pub use bindings::LoggingBindings;
pub use drivers::{Driver, DriverRegistry};
pub use introspection::IntrospectionCache;

use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};
use unitloader_api::{CleanupError, CleanupHook, OwnerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    Created,
    Active,
    TornDown,
}

/// Result of one hook's release.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub hook: String,
    pub error: Option<CleanupError>,
}

/// What a cleanup pass did.
#[derive(Debug, Default, Clone)]
pub struct CleanupReport {
    pub steps: Vec<StepOutcome>,
}

impl CleanupReport {
    pub fn steps_run(&self) -> usize {
        self.steps.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| s.error.is_some())
    }

    pub fn failed_hooks(&self) -> Vec<&str> {
        self.failures().map(|s| s.hook.as_str()).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

pub struct CleanupRegistry {
    hooks: RwLock<Vec<Arc<dyn CleanupHook>>>,
    state: RwLock<RegistryState>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self {
            hooks: RwLock::new(Vec::new()),
            state: RwLock::new(RegistryState::Created),
        }
    }

    /// A registry that is already initialized.
    pub fn active() -> Self {
        let registry = Self::new();
        registry.init();
        registry
    }

    pub fn state(&self) -> RegistryState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn init(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        match *state {
            RegistryState::Created => *state = RegistryState::Active,
            RegistryState::Active => {}
            RegistryState::TornDown => warn!("Cleanup registry cannot be re-initialized after teardown"),
        }
    }

    /// Stop accepting hooks and drop the registered ones.
    pub fn teardown(&self) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = RegistryState::TornDown;
        self.hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Register a hook; hooks run in registration order. Refused after teardown.
    pub fn register(&self, hook: Arc<dyn CleanupHook>) -> bool {
        if self.state() == RegistryState::TornDown {
            warn!("Refusing cleanup hook '{}': registry torn down", hook.name());
            return false;
        }
        debug!("Registered cleanup hook '{}'", hook.name());
        self.hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hook);
        true
    }

    pub fn hook_names(&self) -> Vec<String> {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|h| h.name().to_string())
            .collect()
    }

    /// Run every hook for `owner`. Failures are logged and reported, never raised.
    pub fn run_for(&self, owner: OwnerId) -> CleanupReport {
        let state = self.state();
        if state != RegistryState::Active {
            warn!("Skipping cleanup for {}: registry is {:?}", owner, state);
            return CleanupReport::default();
        }

        // Snapshot so hooks may register or inspect without deadlocking
        let hooks: Vec<_> = self
            .hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut report = CleanupReport::default();
        for hook in hooks {
            let error = match hook.release_for(owner) {
                Ok(()) => {
                    debug!("Cleanup step '{}' done for {}", hook.name(), owner);
                    None
                }
                Err(e) => {
                    warn!("Cleanup step '{}' failed for {}: {}", hook.name(), owner, e);
                    Some(e)
                }
            };
            report.steps.push(StepOutcome {
                hook: hook.name().to_string(),
                error,
            });
        }
        report
    }
}

impl Default for CleanupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The host's process-wide registries, wired into one cleanup registry.
#[derive(Clone, Default)]
pub struct HostRegistries {
    pub drivers: Arc<DriverRegistry>,
    pub introspection: Arc<IntrospectionCache>,
    pub logging: Arc<LoggingBindings>,
}

impl HostRegistries {
    pub fn new() -> Self {
        Self::default()
    }

    /// An initialized registry running driver deregistration, the
    /// introspection flush and logging release, in that order.
    pub fn cleanup_registry(&self) -> CleanupRegistry {
        let registry = CleanupRegistry::active();
        registry.register(self.drivers.clone());
        registry.register(self.introspection.clone());
        registry.register(self.logging.clone());
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHook {
        name: &'static str,
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingHook {
        fn new(name: &'static str, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    impl CleanupHook for CountingHook {
        fn name(&self) -> &str {
            self.name
        }

        fn release_for(&self, _owner: OwnerId) -> Result<(), CleanupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(CleanupError::Failed {
                    hook: self.name.to_string(),
                    message: "boom".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_failure_does_not_stop_remaining_steps() {
        let registry = CleanupRegistry::active();
        let first = CountingHook::new("first", true);
        let second = CountingHook::new("second", false);
        registry.register(first.clone());
        registry.register(second.clone());

        let report = registry.run_for(OwnerId::next());

        assert_eq!(report.steps_run(), 2);
        assert_eq!(report.failed_hooks(), vec!["first"]);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_inactive_registry_runs_nothing() {
        let registry = CleanupRegistry::new();
        let hook = CountingHook::new("hook", false);
        registry.register(hook.clone());

        assert_eq!(registry.run_for(OwnerId::next()).steps_run(), 0);
        registry.init();
        assert_eq!(registry.run_for(OwnerId::next()).steps_run(), 1);
        assert_eq!(hook.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_teardown_refuses_hooks() {
        let registry = CleanupRegistry::active();
        registry.register(CountingHook::new("hook", false));
        registry.teardown();

        assert_eq!(registry.state(), RegistryState::TornDown);
        assert!(registry.hook_names().is_empty());
        assert!(!registry.register(CountingHook::new("late", false)));
        assert_eq!(registry.run_for(OwnerId::next()).steps_run(), 0);

        registry.init();
        assert_eq!(registry.state(), RegistryState::TornDown);
    }

    #[test]
    fn test_host_registries_order() {
        let host = HostRegistries::new();
        let registry = host.cleanup_registry();
        assert_eq!(
            registry.hook_names(),
            vec!["drivers", "introspection", "logging"]
        );
    }
}
