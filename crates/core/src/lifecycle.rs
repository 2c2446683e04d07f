//! Lifecycle state machine of a unit resolver.
//!
//! ```text
//! NEW --init--> INITIALIZED --start--> STARTED --stop--> STOPPED --destroy--> DESTROYING --> DESTROYED
//!                                         ^                 |
//!                                         +------start------+
//! ```
//!
//! No transition fails: calls that make no sense in the current state are
//! logged and ignored. `stop` runs owner-scoped cleanup before the resolver
//! stops accepting work; `destroy` releases storage handles best-effort.

use crate::cleanup::{CleanupRegistry, CleanupReport};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};
use unitloader_api::{LifecycleState, OwnerId, ReleaseError};

pub struct LifecycleController {
    owner: OwnerId,
    state: RwLock<LifecycleState>,
    /// Advisory; read without coordination, staleness only delays a log line.
    accepting: AtomicBool,
    cleanup: Arc<CleanupRegistry>,
}

impl LifecycleController {
    pub fn new(owner: OwnerId, cleanup: Arc<CleanupRegistry>) -> Self {
        Self {
            owner,
            state: RwLock::new(LifecycleState::New),
            accepting: AtomicBool::new(false),
            cleanup,
        }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the resolver is accepting new work.
    pub fn is_started(&self) -> bool {
        self.accepting.load(Ordering::Relaxed)
    }

    fn set_state(&self, next: LifecycleState) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        debug!("{}: {} -> {}", self.owner, *state, next);
        *state = next;
    }

    pub fn init(&self) {
        match self.state() {
            LifecycleState::New => self.set_state(LifecycleState::Initialized),
            other => debug!("{}: init() ignored in state {}", self.owner, other),
        }
    }

    pub fn start(&self) {
        let state = self.state();
        if state.is_terminal() {
            warn!("{}: start() ignored in state {}", self.owner, state);
            return;
        }
        if state == LifecycleState::New {
            debug!("{}: starting without init()", self.owner);
        }
        self.accepting.store(true, Ordering::Relaxed);
        self.set_state(LifecycleState::Started);
    }

    /// Run cleanup, then stop accepting work. Safe to call repeatedly.
    pub fn stop(&self) -> CleanupReport {
        let state = self.state();
        if state.is_terminal() {
            warn!("{}: stop() ignored in state {}", self.owner, state);
            return CleanupReport::default();
        }

        // Cleanup must see the resolver still accepting work
        let report = self.cleanup.run_for(self.owner);
        if !report.is_clean() {
            warn!(
                "{}: {} of {} cleanup steps failed: {:?}",
                self.owner,
                report.failed_hooks().len(),
                report.steps_run(),
                report.failed_hooks()
            );
        }

        self.accepting.store(false, Ordering::Relaxed);
        self.set_state(LifecycleState::Stopped);
        report
    }

    /// Release storage through `release`, then mark the resolver destroyed.
    /// Release failures are logged; the state advances regardless.
    pub fn destroy(&self, release: impl FnOnce() -> Vec<ReleaseError>) {
        if self.state() == LifecycleState::Destroyed {
            debug!("{}: already destroyed", self.owner);
            return;
        }

        self.accepting.store(false, Ordering::Relaxed);
        self.set_state(LifecycleState::Destroying);

        for failure in release() {
            warn!("{}: resource release failed: {}", self.owner, failure);
        }

        self.set_state(LifecycleState::Destroyed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use unitloader_api::{CleanupError, CleanupHook};

    /// Records whether the controller was still accepting work during cleanup
    struct ObservingHook {
        controller: std::sync::OnceLock<Arc<LifecycleController>>,
        saw_started: AtomicBool,
        calls: AtomicUsize,
    }

    impl CleanupHook for ObservingHook {
        fn name(&self) -> &str {
            "observer"
        }

        fn release_for(&self, _owner: OwnerId) -> Result<(), CleanupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(controller) = self.controller.get() {
                self.saw_started
                    .store(controller.is_started(), Ordering::SeqCst);
            }
            Ok(())
        }
    }

    fn controller_with_observer() -> (Arc<LifecycleController>, Arc<ObservingHook>) {
        let hook = Arc::new(ObservingHook {
            controller: std::sync::OnceLock::new(),
            saw_started: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        });
        let registry = Arc::new(CleanupRegistry::active());
        registry.register(hook.clone());
        let controller = Arc::new(LifecycleController::new(OwnerId::next(), registry));
        let _ = hook.controller.set(controller.clone());
        (controller, hook)
    }

    #[test]
    fn test_full_lifecycle() {
        let (controller, hook) = controller_with_observer();
        assert_eq!(controller.state(), LifecycleState::New);

        controller.init();
        assert_eq!(controller.state(), LifecycleState::Initialized);
        assert!(!controller.is_started());

        controller.start();
        assert_eq!(controller.state(), LifecycleState::Started);
        assert!(controller.is_started());

        let report = controller.stop();
        assert_eq!(report.steps_run(), 1);
        assert_eq!(controller.state(), LifecycleState::Stopped);
        assert!(!controller.is_started());
        assert_eq!(hook.calls.load(Ordering::SeqCst), 1);

        controller.destroy(Vec::new);
        assert_eq!(controller.state(), LifecycleState::Destroyed);
    }

    #[test]
    fn test_cleanup_runs_before_flag_flips() {
        let (controller, hook) = controller_with_observer();
        controller.init();
        controller.start();
        controller.stop();
        assert!(hook.saw_started.load(Ordering::SeqCst));
    }

    #[test]
    fn test_stop_twice_runs_cleanup_twice() {
        let (controller, hook) = controller_with_observer();
        controller.start();
        controller.stop();
        controller.stop();
        assert_eq!(hook.calls.load(Ordering::SeqCst), 2);
        assert_eq!(controller.state(), LifecycleState::Stopped);
    }

    #[test]
    fn test_restart_after_stop() {
        let (controller, _) = controller_with_observer();
        controller.init();
        controller.start();
        controller.stop();
        controller.start();
        assert_eq!(controller.state(), LifecycleState::Started);
        assert!(controller.is_started());
    }

    #[test]
    fn test_destroy_survives_release_failures() {
        let (controller, _) = controller_with_observer();
        controller.destroy(|| {
            vec![ReleaseError::Close {
                location: "archive:file:///u/a.jar!/".to_string(),
                message: "busy".to_string(),
            }]
        });
        assert_eq!(controller.state(), LifecycleState::Destroyed);
    }

    #[test]
    fn test_no_transitions_after_destroy() {
        let (controller, hook) = controller_with_observer();
        controller.destroy(Vec::new);

        controller.init();
        controller.start();
        let report = controller.stop();

        assert_eq!(report.steps_run(), 0);
        assert_eq!(hook.calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.state(), LifecycleState::Destroyed);
        assert!(!controller.is_started());
    }

    #[test]
    fn test_destroy_releases_once() {
        let (controller, _) = controller_with_observer();
        let releases = AtomicUsize::new(0);
        controller.destroy(|| {
            releases.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        });
        controller.destroy(|| {
            releases.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        });
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }
}
