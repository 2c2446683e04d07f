use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a unit resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    New,
    Initialized,
    Started,
    Stopped,
    Destroying,
    Destroyed,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::New => "NEW",
            LifecycleState::Initialized => "INITIALIZED",
            LifecycleState::Started => "STARTED",
            LifecycleState::Stopped => "STOPPED",
            LifecycleState::Destroying => "DESTROYING",
            LifecycleState::Destroyed => "DESTROYED",
        }
    }

    /// True once teardown has begun; no transition leaves these states
    /// except `Destroying -> Destroyed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Destroying | LifecycleState::Destroyed)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observer of lifecycle events. Accepted for API compatibility only.
pub trait LifecycleListener: Send + Sync {
    fn on_transition(&self, from: LifecycleState, to: LifecycleState);
}

/// Lifecycle surface driven by the hosting container.
///
/// Transitions never fail: out-of-order calls are logged and ignored.
pub trait Lifecycle: Send + Sync {
    fn init(&self);

    fn start(&self);

    fn stop(&self);

    fn destroy(&self);

    fn state(&self) -> LifecycleState;

    fn state_name(&self) -> &'static str {
        self.state().as_str()
    }

    fn add_lifecycle_listener(&self, _listener: std::sync::Arc<dyn LifecycleListener>) {}

    fn find_lifecycle_listeners(&self) -> Vec<std::sync::Arc<dyn LifecycleListener>> {
        Vec::new()
    }

    fn remove_lifecycle_listener(&self, _listener: &std::sync::Arc<dyn LifecycleListener>) {}
}
