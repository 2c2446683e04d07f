//! Tracing bootstrap for processes that host unit resolvers.
//!
//! Every resolver records its work inside a `unit` span carrying the unit
//! id and owner identity, so interleaved lookups of several units can be
//! told apart in one log file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::Span;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use unitloader_api::{OwnerId, UnitId};

const DEFAULT_FILTER: &str = "info";

/// `logging` section of the loader configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogOptions {
    /// Where daily log files go; `~/.unitloader/logs` when unset.
    pub directory: Option<PathBuf>,
    /// Filter directive used when `RUST_LOG` is not set, e.g.
    /// `"unitloader_core::resolver=debug"`.
    pub filter: Option<String>,
}

impl LogOptions {
    pub fn directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(default_log_dir)
    }

    pub fn filter_directive(&self) -> &str {
        self.filter.as_deref().unwrap_or(DEFAULT_FILTER)
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(self.filter_directive()).unwrap_or_else(|e| {
                eprintln!("Ignoring log filter {:?}: {}", self.filter_directive(), e);
                EnvFilter::new(DEFAULT_FILTER)
            })
        })
    }
}

fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".unitloader")
        .join("logs")
}

/// Span a resolver enters for lookups and lifecycle transitions.
pub fn unit_span(unit: &UnitId, owner: OwnerId) -> Span {
    tracing::info_span!("unit", id = %unit, owner = %owner)
}

/// Install the global subscriber. Logs roll daily into
/// `<directory>/<component>.<date>`; keep the guard alive until exit.
pub fn init_logging(component: &str, options: &LogOptions, to_stderr: bool) -> WorkerGuard {
    let log_dir = options.directory();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Cannot create log directory {}: {}", log_dir.display(), e);
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true);

    let registry = tracing_subscriber::registry()
        .with(options.env_filter())
        .with(file_layer);

    if to_stderr {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);
        registry.with(stderr_layer).init();
    } else {
        registry.init();
    }

    guard
}
