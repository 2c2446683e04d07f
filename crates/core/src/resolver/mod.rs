//! The unit resolver: cache, delegation chain and lifecycle combined.

mod builder;
mod own_scope;

pub use builder::UnitResolverBuilder;
pub use own_scope::OwnScope;

use crate::chain::DelegateChain;
use crate::classpath::Extraction;
use crate::cleanup::CleanupReport;
use crate::config::CleanupOptions;
use crate::lifecycle::LifecycleController;
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{Span, debug, info};
use unitloader_api::{
    ChainCustomizer, ClassHandle, ClassTransformer, ContentLocation, Lifecycle, LifecycleState,
    OwnerId, ResolveError, ResolveResult, Resolver, ResolverScope, ResourceIter, ResourceStream,
    UnitId, UnitSource,
};
use url::Url;

/// Resolves classes and resources for one deployed unit.
///
/// Lookups go cache first, then the delegation chain (own scope, host
/// scopes, extensions). A resolved class is cached for the resolver's
/// lifetime and never re-resolved.
pub struct UnitResolver {
    owner: OwnerId,
    unit: UnitId,
    extraction: Extraction,
    own: Arc<OwnScope>,
    chain: DelegateChain,
    cache: DashMap<String, ClassHandle>,
    lifecycle: LifecycleController,
    customizer: Arc<dyn ChainCustomizer>,
    options: RwLock<CleanupOptions>,
    span: Span,
}

impl UnitResolver {
    pub fn builder(unit: Arc<dyn UnitSource>) -> UnitResolverBuilder {
        UnitResolverBuilder::new(unit)
    }

    /// Resolver with no host scopes and default collaborators.
    pub fn new(unit: Arc<dyn UnitSource>) -> Self {
        Self::builder(unit).build()
    }

    pub fn unit(&self) -> &UnitId {
        &self.unit
    }

    /// Identity handed to cleanup hooks on `stop()`.
    pub fn owner_id(&self) -> OwnerId {
        self.owner
    }

    pub fn chain(&self) -> &DelegateChain {
        &self.chain
    }

    pub fn own_scope(&self) -> &OwnScope {
        &self.own
    }

    /// Locations extracted from the unit's classpath header at construction.
    pub fn locations(&self) -> &BTreeSet<ContentLocation> {
        &self.extraction.locations
    }

    pub fn extraction(&self) -> &Extraction {
        &self.extraction
    }

    pub fn find_loaded_class(&self, name: &str) -> Option<ClassHandle> {
        self.cache.get(name).map(|entry| entry.value().clone())
    }

    pub fn loaded_class_count(&self) -> usize {
        self.cache.len()
    }

    pub fn is_started(&self) -> bool {
        self.lifecycle.is_started()
    }

    fn is_unusable(&self) -> bool {
        self.lifecycle.state().is_terminal()
    }

    /// Forward a transformer registration to the customizer.
    pub fn add_transformer(&self, transformer: Arc<dyn ClassTransformer>) {
        self.customizer.add_transformer(transformer, &self.unit);
    }

    pub fn throwaway_scope(&self) -> Option<Arc<dyn ResolverScope>> {
        self.customizer.throwaway_scope(&self.unit)
    }

    /// Like [`Lifecycle::stop`], returning what the cleanup hooks did.
    pub fn stop_with_report(&self) -> CleanupReport {
        let _enter = self.span.enter();
        self.lifecycle.stop()
    }

    pub fn cleanup_options(&self) -> CleanupOptions {
        *self.options.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn update_options(&self, option: &str, value: bool, apply: impl FnOnce(&mut CleanupOptions)) {
        let mut options = self.options.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut options);
        debug!("{}: {} = {} (recorded, not enforced)", self.owner, option, value);
    }

    pub fn set_clear_references_static(&self, value: bool) {
        self.update_options("clear_references_static", value, |o| {
            o.clear_references_static = value
        });
    }

    pub fn set_clear_references_stop_threads(&self, value: bool) {
        self.update_options("clear_references_stop_threads", value, |o| {
            o.clear_references_stop_threads = value
        });
    }

    pub fn set_clear_references_stop_timer_threads(&self, value: bool) {
        self.update_options("clear_references_stop_timer_threads", value, |o| {
            o.clear_references_stop_timer_threads = value
        });
    }

    pub fn set_clear_references_http_client_keep_alive_thread(&self, value: bool) {
        self.update_options("clear_references_http_client_keep_alive_thread", value, |o| {
            o.clear_references_http_client_keep_alive_thread = value
        });
    }

    pub fn set_clear_references_rmi_targets(&self, value: bool) {
        self.update_options("clear_references_rmi_targets", value, |o| {
            o.clear_references_rmi_targets = value
        });
    }
}

impl Resolver for UnitResolver {
    fn load_class(&self, name: &str) -> ResolveResult<ClassHandle> {
        let _enter = self.span.enter();
        debug!("{}: load_class({})", self.owner, name);

        if !self.lifecycle.is_started() {
            info!(
                "{}: illegal access to {} resolver while loading {}",
                self.owner,
                self.lifecycle.state(),
                name
            );
        }
        if self.is_unusable() {
            return Err(ResolveError::ClassNotFound(name.to_string()));
        }

        if let Some(hit) = self.find_loaded_class(name) {
            debug!("  Returning class {} from cache", name);
            return Ok(hit);
        }

        match self.chain.resolve_class(name) {
            Some(handle) => {
                debug!("  Loaded class {} from {}", name, handle.scope);
                // Destroy may have cleared the cache while the chain was queried
                if self.is_unusable() {
                    return Err(ResolveError::ClassNotFound(name.to_string()));
                }
                // First insert wins so a name keeps one handle
                let cached = self
                    .cache
                    .entry(name.to_string())
                    .or_insert(handle)
                    .value()
                    .clone();
                Ok(cached)
            }
            None => {
                debug!("  Class {} not found", name);
                Err(ResolveError::ClassNotFound(name.to_string()))
            }
        }
    }

    fn get_resource(&self, name: &str) -> Option<Url> {
        let _enter = self.span.enter();
        debug!("{}: get_resource({})", self.owner, name);
        if self.is_unusable() {
            return None;
        }
        let found = self.chain.resolve_resource(name);
        match &found {
            Some(url) => debug!("  Resource {} found at {}", name, url),
            None => debug!("  Resource {} not found", name),
        }
        found
    }

    fn get_resource_as_stream(&self, name: &str) -> Option<ResourceStream> {
        if self.is_unusable() {
            return None;
        }
        self.chain.open_resource(name)
    }

    fn get_all_resources<'a>(&'a self, name: &'a str) -> ResourceIter<'a> {
        if self.is_unusable() {
            return Box::new(std::iter::empty());
        }
        self.chain.resolve_all_resources(name)
    }
}

impl Lifecycle for UnitResolver {
    fn init(&self) {
        let _enter = self.span.enter();
        self.lifecycle.init();
    }

    fn start(&self) {
        let _enter = self.span.enter();
        self.lifecycle.start();
    }

    fn stop(&self) {
        let _enter = self.span.enter();
        self.lifecycle.stop();
    }

    fn destroy(&self) {
        let _enter = self.span.enter();
        self.lifecycle.destroy(|| {
            self.cache.clear();
            self.own.release()
        });
    }

    fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}

impl std::fmt::Debug for UnitResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitResolver")
            .field("owner", &self.owner)
            .field("unit", &self.unit)
            .field("state", &self.lifecycle.state())
            .field("chain", &self.chain)
            .field("cached", &self.cache.len())
            .finish()
    }
}
