use std::sync::Arc;
use unitloader_api::{ClassHandle, ReleaseError, ResolverScope, ResourceStream};
use unitloader_archive::RootScope;
use url::Url;

/// The unit's own scope: its primary root, then its extracted classpath.
pub struct OwnScope {
    name: String,
    primary: Option<Arc<dyn ResolverScope>>,
    classpath: RootScope,
}

impl OwnScope {
    pub fn new(
        name: impl Into<String>,
        primary: Option<Arc<dyn ResolverScope>>,
        classpath: RootScope,
    ) -> Self {
        Self {
            name: name.into(),
            primary,
            classpath,
        }
    }

    pub fn classpath(&self) -> &RootScope {
        &self.classpath
    }

    /// Close every classpath handle. The primary root belongs to the unit.
    pub fn release(&self) -> Vec<ReleaseError> {
        self.classpath.close_all()
    }

    fn layers(&self) -> Vec<&dyn ResolverScope> {
        let mut layers: Vec<&dyn ResolverScope> = Vec::with_capacity(2);
        if let Some(primary) = &self.primary {
            layers.push(primary.as_ref());
        }
        layers.push(&self.classpath);
        layers
    }
}

impl ResolverScope for OwnScope {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_class(&self, name: &str) -> Option<ClassHandle> {
        self.layers().into_iter().find_map(|s| s.resolve_class(name))
    }

    fn resolve_resource(&self, name: &str) -> Option<Url> {
        self.layers().into_iter().find_map(|s| s.resolve_resource(name))
    }

    fn resolve_all_resources(&self, name: &str) -> Vec<Url> {
        self.layers()
            .into_iter()
            .flat_map(|s| s.resolve_all_resources(name))
            .collect()
    }

    fn open_resource(&self, name: &str) -> Option<ResourceStream> {
        self.layers()
            .into_iter()
            .find(|s| s.resolve_resource(name).is_some())?
            .open_resource(name)
    }
}
