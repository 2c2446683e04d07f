/// The only error a caller of `load_class` ever sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("class not found: {0}")]
    ClassNotFound(String),
}

/// Why a classpath token contributed no location. Logged, never surfaced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractIssue {
    #[error("classpath entry '{token}' has no backing location")]
    EntryUnresolved { token: String },
    #[error("classpath entry '{token}' resolved to unusable location '{raw}': {reason}")]
    MalformedLocation {
        token: String,
        raw: String,
        reason: String,
    },
}

/// Failure reported by a cleanup hook while releasing owner-scoped state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CleanupError {
    #[error("{hook}: {message}")]
    Failed { hook: String, message: String },
    #[error("{hook}: {failed} of {attempted} releases failed")]
    Partial {
        hook: String,
        failed: usize,
        attempted: usize,
    },
}

/// Failure while closing a storage handle at destroy time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReleaseError {
    #[error("failed to close {location}: {message}")]
    Close { location: String, message: String },
    #[error("handle for {0} was poisoned by a panicking reader")]
    Poisoned(String),
}

pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Error type for collaborator operations whose failure is only ever logged.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
