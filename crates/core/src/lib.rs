pub mod error;
pub mod logging;

pub mod chain;
pub mod classpath;
pub mod cleanup;
pub mod config;
pub mod customizer;
pub mod host;
pub mod lifecycle;
pub mod resolver;

pub use chain::DelegateChain;
pub use classpath::{ClasspathExtractor, Extraction};
pub use cleanup::{CleanupRegistry, CleanupReport, HostRegistries};
pub use config::{CleanupOptions, LoaderConfig};
pub use customizer::{NoopCustomizer, StaticCustomizer};
pub use error::{LoaderError, Result};
pub use host::ConfiguredScopes;
pub use lifecycle::LifecycleController;
pub use logging::LogOptions;
pub use resolver::{UnitResolver, UnitResolverBuilder};
