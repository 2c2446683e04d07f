use crate::model::UnitId;
use crate::scope::ResolverScope;
use std::sync::Arc;

/// Rewrites class bytes before definition. Only registration is modeled.
pub trait ClassTransformer: Send + Sync {
    fn transform(&self, class_name: &str, bytes: &[u8]) -> Option<Vec<u8>>;
}

/// Supplies per-unit additions to the delegation chain.
pub trait ChainCustomizer: Send + Sync {
    /// Scopes appended after the host scopes, in the returned order.
    fn extend_chain(&self, unit: &UnitId) -> Vec<Arc<dyn ResolverScope>>;

    fn add_transformer(&self, transformer: Arc<dyn ClassTransformer>, unit: &UnitId);

    /// A scope for speculative loading that must not pollute the unit's cache.
    fn throwaway_scope(&self, unit: &UnitId) -> Option<Arc<dyn ResolverScope>>;
}
