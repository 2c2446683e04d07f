use crate::entry_path;
use crate::error::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Mutex;
use unitloader_api::{ContentLocation, ContentRoot, ReleaseError};
use url::Url;
use zip::ZipArchive;

/// A zip/jar root. Keeps the archive open until [`ContentRoot::close`].
pub struct ArchiveRoot {
    location: ContentLocation,
    archive: Mutex<Option<ZipArchive<File>>>,
}

impl ArchiveRoot {
    pub fn open(path: &Path, location: ContentLocation) -> Result<Self> {
        let file = File::open(path)?;
        let archive = ZipArchive::new(file)?;
        Ok(Self {
            location,
            archive: Mutex::new(Some(archive)),
        })
    }

    pub fn is_open(&self) -> bool {
        self.archive.lock().map(|a| a.is_some()).unwrap_or(false)
    }
}

impl ContentRoot for ArchiveRoot {
    fn location(&self) -> &ContentLocation {
        &self.location
    }

    fn find_entry(&self, entry: &str) -> Option<Url> {
        let entry = entry_path(entry)?;
        let mut guard = self.archive.lock().ok()?;
        let archive = guard.as_mut()?;
        let found = archive.by_name(entry).map(|f| f.is_file()).unwrap_or(false);
        if found {
            self.location.entry_url(entry)
        } else {
            None
        }
    }

    fn read_entry(&self, entry: &str) -> Option<Vec<u8>> {
        let entry = entry_path(entry)?;
        let mut guard = self.archive.lock().ok()?;
        let archive = guard.as_mut()?;
        let mut file = archive.by_name(entry).ok()?;
        if !file.is_file() {
            return None;
        }
        let mut bytes = Vec::new();
        match file.read_to_end(&mut bytes) {
            Ok(_) => Some(bytes),
            Err(e) => {
                tracing::warn!("Failed to read {} from {}: {}", entry, self.location, e);
                None
            }
        }
    }

    fn entry_names(&self) -> Vec<String> {
        let guard = match self.archive.lock() {
            Ok(guard) => guard,
            Err(_) => return Vec::new(),
        };
        let Some(archive) = guard.as_ref() else {
            return Vec::new();
        };
        let mut names: Vec<String> = archive
            .file_names()
            .filter(|name| !name.ends_with('/'))
            .map(String::from)
            .collect();
        names.sort();
        names
    }

    fn close(&self) -> std::result::Result<(), ReleaseError> {
        let mut guard = self
            .archive
            .lock()
            .map_err(|_| ReleaseError::Poisoned(self.location.to_string()))?;
        // Dropping the archive closes the file handle.
        guard.take();
        Ok(())
    }
}
