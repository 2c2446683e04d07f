use dashmap::DashMap;
use tracing::debug;
use unitloader_api::{CleanupError, CleanupHook, OwnerId};

/// Logger bindings established on behalf of a resolver.
#[derive(Default)]
pub struct LoggingBindings {
    bindings: DashMap<OwnerId, Vec<String>>,
}

impl LoggingBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, owner: OwnerId, logger: impl Into<String>) {
        self.bindings.entry(owner).or_default().push(logger.into());
    }

    pub fn bindings_for(&self, owner: OwnerId) -> Vec<String> {
        self.bindings
            .get(&owner)
            .map(|b| b.value().clone())
            .unwrap_or_default()
    }

    pub fn owner_count(&self) -> usize {
        self.bindings.len()
    }
}

impl CleanupHook for LoggingBindings {
    fn name(&self) -> &str {
        "logging"
    }

    fn release_for(&self, owner: OwnerId) -> Result<(), CleanupError> {
        if let Some((_, loggers)) = self.bindings.remove(&owner) {
            debug!("Released {} logger bindings for {}", loggers.len(), owner);
        }
        Ok(())
    }
}
