use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;
use unitloader_api::{ChainCustomizer, ClassTransformer, ResolverScope, UnitId};

/// Adds nothing to the chain and drops transformers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCustomizer;

impl ChainCustomizer for NoopCustomizer {
    fn extend_chain(&self, _unit: &UnitId) -> Vec<Arc<dyn ResolverScope>> {
        Vec::new()
    }

    fn add_transformer(&self, _transformer: Arc<dyn ClassTransformer>, unit: &UnitId) {
        debug!("No instrumentation support; dropping transformer for {}", unit);
    }

    fn throwaway_scope(&self, _unit: &UnitId) -> Option<Arc<dyn ResolverScope>> {
        None
    }
}

/// Appends a fixed list of scopes to every unit's chain and records
/// transformer registrations per unit.
#[derive(Default)]
pub struct StaticCustomizer {
    extensions: Vec<Arc<dyn ResolverScope>>,
    throwaway: Option<Arc<dyn ResolverScope>>,
    transformers: RwLock<Vec<(UnitId, Arc<dyn ClassTransformer>)>>,
}

impl StaticCustomizer {
    pub fn new(extensions: Vec<Arc<dyn ResolverScope>>) -> Self {
        Self {
            extensions,
            throwaway: None,
            transformers: RwLock::new(Vec::new()),
        }
    }

    pub fn with_throwaway(mut self, scope: Arc<dyn ResolverScope>) -> Self {
        self.throwaway = Some(scope);
        self
    }

    /// Transformers registered for `unit`, in registration order.
    pub fn transformers_for(&self, unit: &UnitId) -> Vec<Arc<dyn ClassTransformer>> {
        self.transformers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(id, _)| id == unit)
            .map(|(_, t)| t.clone())
            .collect()
    }
}

impl ChainCustomizer for StaticCustomizer {
    fn extend_chain(&self, _unit: &UnitId) -> Vec<Arc<dyn ResolverScope>> {
        self.extensions.clone()
    }

    fn add_transformer(&self, transformer: Arc<dyn ClassTransformer>, unit: &UnitId) {
        self.transformers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((unit.clone(), transformer));
    }

    fn throwaway_scope(&self, _unit: &UnitId) -> Option<Arc<dyn ResolverScope>> {
        self.throwaway.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unitloader_api::{ClassHandle, LoadedClass, ResourceStream};
    use url::Url;

    struct Named(&'static str);

    impl ResolverScope for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn resolve_class(&self, name: &str) -> Option<ClassHandle> {
            Some(Arc::new(LoadedClass::new(name, self.0)))
        }

        fn resolve_resource(&self, _name: &str) -> Option<Url> {
            None
        }

        fn resolve_all_resources(&self, _name: &str) -> Vec<Url> {
            Vec::new()
        }

        fn open_resource(&self, _name: &str) -> Option<ResourceStream> {
            None
        }
    }

    struct Identity;

    impl ClassTransformer for Identity {
        fn transform(&self, _class_name: &str, bytes: &[u8]) -> Option<Vec<u8>> {
            Some(bytes.to_vec())
        }
    }

    #[test]
    fn test_noop_customizer_adds_nothing() {
        let unit = UnitId::new("shop");
        let customizer = NoopCustomizer;
        assert!(customizer.extend_chain(&unit).is_empty());
        assert!(customizer.throwaway_scope(&unit).is_none());
        customizer.add_transformer(Arc::new(Identity), &unit);
    }

    #[test]
    fn test_static_customizer_records_transformers_per_unit() {
        let shop = UnitId::new("shop");
        let other = UnitId::new("other");
        let ext: Arc<dyn ResolverScope> = Arc::new(Named("ext"));
        let customizer =
            StaticCustomizer::new(vec![ext]).with_throwaway(Arc::new(Named("scratch")));

        customizer.add_transformer(Arc::new(Identity), &shop);
        customizer.add_transformer(Arc::new(Identity), &shop);

        assert_eq!(customizer.transformers_for(&shop).len(), 2);
        assert!(customizer.transformers_for(&other).is_empty());
        assert_eq!(customizer.extend_chain(&other)[0].name(), "ext");
        assert_eq!(customizer.throwaway_scope(&shop).unwrap().name(), "scratch");
    }
}
