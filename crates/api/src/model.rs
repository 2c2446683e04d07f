use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use url::Url;

/// Identity of a deployable unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a resolver instance. Cleanup hooks key their state by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub u64);

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

impl OwnerId {
    /// Allocate a fresh, process-unique owner identity.
    pub fn next() -> Self {
        Self(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "owner#{}", self.0)
    }
}

/// A class definition produced by a resolver scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedClass {
    /// Fully-qualified, dot-separated name.
    pub name: String,
    /// Name of the scope that supplied the definition.
    pub scope: String,
    /// Where the definition was read from, when it came from storage.
    pub location: Option<Url>,
    pub bytes: Vec<u8>,
}

impl LoadedClass {
    pub fn new(name: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: scope.into(),
            location: None,
            bytes: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: Url) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.bytes = bytes;
        self
    }
}

/// Shared handle to a resolved class. Identity is pointer identity.
pub type ClassHandle = Arc<LoadedClass>;

/// Convert a dotted class name to its storage entry (`a.b.C` -> `a/b/C.class`).
pub fn class_entry_name(name: &str) -> String {
    format!("{}.class", name.replace('.', "/"))
}
