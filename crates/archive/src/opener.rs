use crate::directory::DirectoryRoot;
use crate::error::{ArchiveError, Result};
use crate::jar::ArchiveRoot;
use std::path::{Path, PathBuf};
use unitloader_api::{BoxError, ContentLocation, ContentRoot, RootOpener};
use url::Url;

/// Opens `file:` locations from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRootOpener;

impl FsRootOpener {
    pub fn new() -> Self {
        Self
    }

    /// Open a location into a concrete root.
    pub fn open_location(&self, location: &ContentLocation) -> Result<Box<dyn ContentRoot>> {
        let path = file_path(location.backing())?;
        match location {
            ContentLocation::Directory { .. } => {
                if !path.is_dir() {
                    return Err(ArchiveError::NotADirectory(path));
                }
                Ok(Box::new(DirectoryRoot::new(path, location.clone())))
            }
            ContentLocation::ArchiveRoot { .. } => {
                Ok(Box::new(ArchiveRoot::open(&path, location.clone())?))
            }
        }
    }

    /// Open a path given directly (directories as-is, anything else as an archive).
    pub fn open_path(&self, path: &Path) -> Result<Box<dyn ContentRoot>> {
        let location = location_for_path(path)?;
        self.open_location(&location)
    }
}

impl RootOpener for FsRootOpener {
    fn open(&self, location: &ContentLocation) -> std::result::Result<Box<dyn ContentRoot>, BoxError> {
        Ok(self.open_location(location)?)
    }
}

/// Classify a filesystem path as a content location.
pub fn location_for_path(path: &Path) -> Result<ContentLocation> {
    let path = path.canonicalize()?;
    if path.is_dir() {
        let url = Url::from_directory_path(&path)
            .map_err(|_| ArchiveError::UnsupportedLocation(path.display().to_string()))?;
        Ok(ContentLocation::directory(url))
    } else {
        let url = Url::from_file_path(&path)
            .map_err(|_| ArchiveError::UnsupportedLocation(path.display().to_string()))?;
        ContentLocation::archive(url)
            .map_err(|e| ArchiveError::UnsupportedLocation(format!("{}: {}", path.display(), e)))
    }
}

fn file_path(url: &Url) -> Result<PathBuf> {
    if url.scheme() != "file" {
        return Err(ArchiveError::UnsupportedLocation(url.to_string()));
    }
    url.to_file_path()
        .map_err(|_| ArchiveError::UnsupportedLocation(url.to_string()))
}
