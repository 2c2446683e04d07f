//! Filesystem storage for unit resolution: directory and zip roots, a
//! resolver scope over opened roots, and directory-backed units.

pub mod directory;
pub mod error;
pub mod jar;
pub mod manifest;
pub mod opener;
pub mod scope;
pub mod unit;

pub use directory::DirectoryRoot;
pub use error::{ArchiveError, Result};
pub use jar::ArchiveRoot;
pub use manifest::Manifest;
pub use opener::{FsRootOpener, location_for_path};
pub use scope::RootScope;
pub use unit::DirectoryUnit;

/// Normalize a relative entry name, refusing anything that escapes its root.
pub(crate) fn entry_path(entry: &str) -> Option<&str> {
    let entry = entry.trim_start_matches('/');
    if entry.is_empty() || entry.split('/').any(|part| part == "..") {
        return None;
    }
    Some(entry)
}
