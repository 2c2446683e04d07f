use super::{OwnScope, UnitResolver};
use crate::chain::DelegateChain;
use crate::classpath::ClasspathExtractor;
use crate::cleanup::CleanupRegistry;
use crate::config::CleanupOptions;
use crate::customizer::NoopCustomizer;
use crate::lifecycle::LifecycleController;
use crate::logging;
use dashmap::DashMap;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};
use unitloader_api::{
    ChainCustomizer, ExtractIssue, OwnerId, ResolverScope, RootOpener, UnitSource,
};
use unitloader_archive::{FsRootOpener, RootScope};

/// Builder for [`UnitResolver`]
pub struct UnitResolverBuilder {
    unit: Arc<dyn UnitSource>,
    host_scopes: Vec<Arc<dyn ResolverScope>>,
    customizer: Arc<dyn ChainCustomizer>,
    cleanup: Option<Arc<CleanupRegistry>>,
    opener: Arc<dyn RootOpener>,
    options: CleanupOptions,
}

impl UnitResolverBuilder {
    pub fn new(unit: Arc<dyn UnitSource>) -> Self {
        Self {
            unit,
            host_scopes: Vec::new(),
            customizer: Arc::new(NoopCustomizer),
            cleanup: None,
            opener: Arc::new(FsRootOpener::new()),
            options: CleanupOptions::default(),
        }
    }

    /// Add a host scope; host scopes follow the own scope in added order.
    pub fn add_host_scope(mut self, scope: Arc<dyn ResolverScope>) -> Self {
        self.host_scopes.push(scope);
        self
    }

    pub fn with_host_scopes(
        mut self,
        scopes: impl IntoIterator<Item = Arc<dyn ResolverScope>>,
    ) -> Self {
        self.host_scopes.extend(scopes);
        self
    }

    pub fn with_customizer(mut self, customizer: Arc<dyn ChainCustomizer>) -> Self {
        self.customizer = customizer;
        self
    }

    pub fn with_cleanup(mut self, cleanup: Arc<CleanupRegistry>) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    pub fn with_opener(mut self, opener: Arc<dyn RootOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn with_options(mut self, options: CleanupOptions) -> Self {
        self.options = options;
        self
    }

    /// Extract the unit's classpath, open its locations and compose the chain.
    pub fn build(self) -> UnitResolver {
        let owner = OwnerId::next();
        let unit_id = self.unit.id().clone();

        let extraction = ClasspathExtractor::extract_detailed(self.unit.as_ref());

        let mut roots = Vec::with_capacity(extraction.locations.len());
        for location in &extraction.locations {
            match self.opener.open(location) {
                Ok(root) => roots.push(root),
                Err(e) => warn!(
                    "{}",
                    ExtractIssue::MalformedLocation {
                        token: location.to_string(),
                        raw: location.backing().to_string(),
                        reason: e.to_string(),
                    }
                ),
            }
        }

        let own = Arc::new(OwnScope::new(
            format!("{}:own", unit_id),
            self.unit.primary_scope(),
            RootScope::new(format!("{}:classpath", unit_id), roots),
        ));

        let extensions = self.customizer.extend_chain(&unit_id);
        let chain = DelegateChain::compose(own.clone(), self.host_scopes, extensions);

        info!(
            "Resolver {} for unit {}: {} classpath locations, chain {:?}",
            owner,
            unit_id,
            extraction.locations.len(),
            chain.scope_names()
        );

        let cleanup = self
            .cleanup
            .unwrap_or_else(|| Arc::new(CleanupRegistry::active()));

        let span = logging::unit_span(&unit_id, owner);
        UnitResolver {
            owner,
            unit: unit_id,
            extraction,
            own,
            chain,
            cache: DashMap::new(),
            lifecycle: LifecycleController::new(owner, cleanup),
            customizer: self.customizer,
            options: RwLock::new(self.options),
            span,
        }
    }
}
