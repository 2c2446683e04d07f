//! Content locations: the roots a unit resolves classes and resources from.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Scheme used for browsable archive roots (`archive:<location>!/`).
pub const ARCHIVE_SCHEME: &str = "archive";

/// Separator between an archive location and a path inside it.
pub const ARCHIVE_SEPARATOR: &str = "!/";

/// A normalized handle to a resolvable root.
///
/// Equality, ordering and hashing are structural, so a set of locations
/// de-duplicates roots reached through different classpath tokens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentLocation {
    /// A plain directory, used as-is.
    Directory { url: Url },
    /// A packaged container wrapped as a browsable root.
    ArchiveRoot { archive: Url, root: Url },
}

impl ContentLocation {
    pub fn directory(url: Url) -> Self {
        ContentLocation::Directory { url }
    }

    /// Wrap an archive location `X` as the browsable root `archive:X!/`.
    pub fn archive(archive: Url) -> Result<Self, url::ParseError> {
        let root = Url::parse(&format!(
            "{}:{}{}",
            ARCHIVE_SCHEME, archive, ARCHIVE_SEPARATOR
        ))?;
        Ok(ContentLocation::ArchiveRoot { archive, root })
    }

    /// The URI this location is known by.
    pub fn uri(&self) -> &Url {
        match self {
            ContentLocation::Directory { url } => url,
            ContentLocation::ArchiveRoot { root, .. } => root,
        }
    }

    /// The underlying storage: the directory itself or the archive file.
    pub fn backing(&self) -> &Url {
        match self {
            ContentLocation::Directory { url } => url,
            ContentLocation::ArchiveRoot { archive, .. } => archive,
        }
    }

    pub fn is_archive(&self) -> bool {
        matches!(self, ContentLocation::ArchiveRoot { .. })
    }

    /// URL of `entry` inside this root.
    pub fn entry_url(&self, entry: &str) -> Option<Url> {
        let entry = entry.trim_start_matches('/');
        match self {
            ContentLocation::Directory { url } => url.join(entry).ok(),
            ContentLocation::ArchiveRoot { root, .. } => {
                Url::parse(&format!("{}{}", root, entry)).ok()
            }
        }
    }
}

impl fmt::Display for ContentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri())
    }
}
