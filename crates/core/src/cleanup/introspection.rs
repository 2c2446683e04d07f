use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;
use unitloader_api::{CleanupError, CleanupHook, OwnerId};

/// Process-wide cache of introspected type descriptions (type name to
/// property names). Entries are not attributable to a single owner, so a
/// release flushes everything.
#[derive(Default)]
pub struct IntrospectionCache {
    entries: DashMap<String, Arc<Vec<String>>>,
}

impl IntrospectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached description of `type_name`, computing it on first use.
    pub fn describe(
        &self,
        type_name: &str,
        compute: impl FnOnce() -> Vec<String>,
    ) -> Arc<Vec<String>> {
        if let Some(entry) = self.entries.get(type_name) {
            return entry.value().clone();
        }
        self.entries
            .entry(type_name.to_string())
            .or_insert_with(|| Arc::new(compute()))
            .value()
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn flush(&self) {
        debug!("Flushing {} introspection entries", self.entries.len());
        self.entries.clear();
    }
}

impl CleanupHook for IntrospectionCache {
    fn name(&self) -> &str {
        "introspection"
    }

    fn release_for(&self, _owner: OwnerId) -> Result<(), CleanupError> {
        self.flush();
        Ok(())
    }
}
