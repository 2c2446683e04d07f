use crate::error::CleanupError;
use crate::model::OwnerId;

/// A collaborator holding state keyed by resolver identity.
pub trait CleanupHook: Send + Sync {
    /// Hook name (for logging and reports)
    fn name(&self) -> &str;

    /// Release everything held for `owner`. Must be safe to call repeatedly.
    fn release_for(&self, owner: OwnerId) -> Result<(), CleanupError>;
}
