use crate::error::Result;
use crate::logging::LogOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Reference-clearing toggles a host may set on a resolver.
///
/// These are recognized but not yet enforced: they are recorded and
/// reported, and change no behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanupOptions {
    pub clear_references_static: bool,
    pub clear_references_stop_threads: bool,
    pub clear_references_stop_timer_threads: bool,
    pub clear_references_http_client_keep_alive_thread: bool,
    pub clear_references_rmi_targets: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    pub cleanup: CleanupOptions,
    /// Directories or archives composed into the host scope.
    pub host_roots: Vec<PathBuf>,
    /// Directories or archives appended after the host scope.
    pub extension_roots: Vec<PathBuf>,
    pub logging: LogOptions,
}

impl LoaderConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
