//! Scopes built from filesystem paths named in a [`LoaderConfig`].

use crate::config::LoaderConfig;
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use unitloader_api::ResolverScope;
use unitloader_archive::{FsRootOpener, RootScope};

pub const HOST_SCOPE_NAME: &str = "host";
pub const EXTENSION_SCOPE_NAME: &str = "extensions";

/// Open every path, in order, as one root of a single scope.
/// Any path that cannot be opened fails the whole scope.
pub fn open_scope<P: AsRef<Path>>(
    name: &str,
    paths: impl IntoIterator<Item = P>,
) -> Result<RootScope> {
    let opener = FsRootOpener::new();
    let scope = RootScope::empty(name);
    for path in paths {
        scope.push(opener.open_path(path.as_ref())?);
    }
    Ok(scope)
}

/// Host and extension scopes of a configuration; empty lists yield no scope.
#[derive(Default)]
pub struct ConfiguredScopes {
    pub host: Vec<Arc<dyn ResolverScope>>,
    pub extensions: Vec<Arc<dyn ResolverScope>>,
}

impl ConfiguredScopes {
    pub fn from_config(config: &LoaderConfig) -> Result<Self> {
        let mut scopes = Self::default();
        if !config.host_roots.is_empty() {
            let host = open_scope(HOST_SCOPE_NAME, &config.host_roots)?;
            info!("Host scope: {} roots", host.len());
            scopes.host.push(Arc::new(host));
        }
        if !config.extension_roots.is_empty() {
            let extensions = open_scope(EXTENSION_SCOPE_NAME, &config.extension_roots)?;
            info!("Extension scope: {} roots", extensions.len());
            scopes.extensions.push(Arc::new(extensions));
        }
        Ok(scopes)
    }
}
