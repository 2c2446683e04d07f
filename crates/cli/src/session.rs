use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;
use unitloader_api::Lifecycle;
use unitloader_archive::DirectoryUnit;
use unitloader_core::{ConfiguredScopes, HostRegistries, LoaderConfig, StaticCustomizer, UnitResolver};

/// A started resolver over one unit directory.
pub struct Session {
    pub unit: Arc<DirectoryUnit>,
    pub resolver: UnitResolver,
}

impl Session {
    pub fn open(config: &LoaderConfig, unit_dir: &Path) -> anyhow::Result<Self> {
        let scopes = ConfiguredScopes::from_config(config).context("failed to open host roots")?;
        let unit = Arc::new(
            DirectoryUnit::open(unit_dir)
                .with_context(|| format!("failed to open unit {}", unit_dir.display()))?,
        );

        let resolver = UnitResolver::builder(unit.clone())
            .with_host_scopes(scopes.host)
            .with_customizer(Arc::new(StaticCustomizer::new(scopes.extensions)))
            .with_cleanup(Arc::new(HostRegistries::new().cleanup_registry()))
            .with_options(config.cleanup)
            .build();

        resolver.init();
        resolver.start();
        Ok(Self { unit, resolver })
    }

    /// Stop and destroy the resolver.
    pub fn close(self) {
        let report = self.resolver.stop_with_report();
        if !report.is_clean() {
            warn!("Cleanup incomplete: {:?}", report.failed_hooks());
        }
        self.resolver.destroy();
    }
}
