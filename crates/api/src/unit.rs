use crate::model::UnitId;
use crate::scope::ResolverScope;
use std::sync::Arc;

/// Backing store of a deployable unit.
pub trait UnitSource: Send + Sync {
    fn id(&self) -> &UnitId;

    /// Declared classpath header (comma-separated tokens), if any.
    fn classpath_header(&self) -> Option<String>;

    /// Raw location of a relative entry, `None` when it does not exist.
    fn entry_location(&self, entry: &str) -> Option<String>;

    /// The unit's native resolution of its own primary root (`.`).
    fn primary_scope(&self) -> Option<Arc<dyn ResolverScope>> {
        None
    }
}
