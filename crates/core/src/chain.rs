//! Ordered delegation across resolver scopes.

use std::sync::Arc;
use tracing::{trace, warn};
use unitloader_api::{ClassHandle, ResolverScope, ResourceIter, ResourceStream};
use url::Url;

/// An immutable, ordered list of scopes combined into one resolver.
///
/// Classes and single resources come from the first scope that has them.
/// Multi-valued resource lookups visit every scope and concatenate the
/// results in scope order without de-duplication.
#[derive(Clone)]
pub struct DelegateChain {
    scopes: Arc<[Arc<dyn ResolverScope>]>,
}

impl DelegateChain {
    /// Store `scopes` verbatim; their order is resolution precedence.
    pub fn new(scopes: Vec<Arc<dyn ResolverScope>>) -> Self {
        Self {
            scopes: scopes.into(),
        }
    }

    /// Own scope first, then host scopes, then extensions in supplied order.
    pub fn compose(
        own: Arc<dyn ResolverScope>,
        host: impl IntoIterator<Item = Arc<dyn ResolverScope>>,
        extensions: impl IntoIterator<Item = Arc<dyn ResolverScope>>,
    ) -> Self {
        let scopes: Vec<_> = std::iter::once(own)
            .chain(host)
            .chain(extensions)
            .collect();
        Self::new(scopes)
    }

    pub fn scopes(&self) -> &[Arc<dyn ResolverScope>] {
        &self.scopes
    }

    pub fn scope_names(&self) -> Vec<&str> {
        self.scopes.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn resolve_class(&self, name: &str) -> Option<ClassHandle> {
        self.scopes.iter().find_map(|scope| {
            let found = scope.resolve_class(name);
            if found.is_none() {
                trace!("Scope {} has no class {}", scope.name(), name);
            }
            found
        })
    }

    pub fn resolve_resource(&self, name: &str) -> Option<Url> {
        self.scopes
            .iter()
            .find_map(|scope| scope.resolve_resource(name))
    }

    /// Open the resource from the scope that [`DelegateChain::resolve_resource`]
    /// picks, so the stream and the URL always share a scope.
    pub fn open_resource(&self, name: &str) -> Option<ResourceStream> {
        let scope = self
            .scopes
            .iter()
            .find(|scope| scope.resolve_resource(name).is_some())?;
        let stream = scope.open_resource(name);
        if stream.is_none() {
            warn!("Scope {} has resource {} but cannot open it", scope.name(), name);
        }
        stream
    }

    /// Lazily visits every scope; each call recomputes from scratch.
    pub fn resolve_all_resources<'a>(&'a self, name: &'a str) -> ResourceIter<'a> {
        Box::new(
            self.scopes
                .iter()
                .flat_map(move |scope| scope.resolve_all_resources(name)),
        )
    }
}

impl std::fmt::Debug for DelegateChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegateChain")
            .field("scopes", &self.scope_names())
            .finish()
    }
}
