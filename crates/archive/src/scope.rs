//! A resolver scope over an ordered list of opened content roots.

use std::io::Cursor;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;
use unitloader_api::{
    ClassHandle, ContentLocation, ContentRoot, LoadedClass, ReleaseError, ResolverScope,
    ResourceStream, class_entry_name,
};
use url::Url;

/// Resolves classes and resources by probing each root in order.
pub struct RootScope {
    name: String,
    roots: RwLock<Vec<Box<dyn ContentRoot>>>,
}

impl RootScope {
    pub fn new(name: impl Into<String>, roots: Vec<Box<dyn ContentRoot>>) -> Self {
        Self {
            name: name.into(),
            roots: RwLock::new(roots),
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    /// Append a root after the existing ones.
    pub fn push(&self, root: Box<dyn ContentRoot>) {
        self.roots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(root);
    }

    pub fn locations(&self) -> Vec<ContentLocation> {
        self.roots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|r| r.location().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.roots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every entry name of every root, paired with its root.
    pub fn entry_names(&self) -> Vec<(ContentLocation, Vec<String>)> {
        self.roots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|r| (r.location().clone(), r.entry_names()))
            .collect()
    }

    /// Close and drop every root. Returns the failures; the scope is empty
    /// afterwards either way.
    pub fn close_all(&self) -> Vec<ReleaseError> {
        let roots: Vec<_> = self
            .roots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();

        let mut failures = Vec::new();
        for root in roots {
            match root.close() {
                Ok(()) => debug!("Closed {}", root.location()),
                Err(e) => failures.push(e),
            }
        }
        failures
    }

    fn first<T>(&self, f: impl Fn(&dyn ContentRoot) -> Option<T>) -> Option<T> {
        let roots = self.roots.read().unwrap_or_else(PoisonError::into_inner);
        roots.iter().find_map(|r| f(r.as_ref()))
    }
}

impl ResolverScope for RootScope {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve_class(&self, name: &str) -> Option<ClassHandle> {
        let entry = class_entry_name(name);
        self.first(|root| {
            let bytes = root.read_entry(&entry)?;
            let mut class = LoadedClass::new(name, self.name.clone()).with_bytes(bytes);
            if let Some(url) = root.find_entry(&entry) {
                class = class.with_location(url);
            }
            Some(Arc::new(class))
        })
    }

    fn resolve_resource(&self, name: &str) -> Option<Url> {
        self.first(|root| root.find_entry(name))
    }

    fn resolve_all_resources(&self, name: &str) -> Vec<Url> {
        let roots = self.roots.read().unwrap_or_else(PoisonError::into_inner);
        roots.iter().filter_map(|r| r.find_entry(name)).collect()
    }

    fn open_resource(&self, name: &str) -> Option<ResourceStream> {
        let bytes = self.first(|root| {
            root.find_entry(name)?;
            root.read_entry(name)
        })?;
        Some(Box::new(Cursor::new(bytes)))
    }
}
