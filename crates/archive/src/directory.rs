use crate::entry_path;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use unitloader_api::{ContentLocation, ContentRoot, ReleaseError};
use url::Url;
use walkdir::WalkDir;

/// An exploded directory root. Holds no OS handles between lookups.
pub struct DirectoryRoot {
    location: ContentLocation,
    dir: PathBuf,
    closed: AtomicBool,
}

impl DirectoryRoot {
    pub fn new(dir: PathBuf, location: ContentLocation) -> Self {
        Self {
            location,
            dir,
            closed: AtomicBool::new(false),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, entry: &str) -> Option<PathBuf> {
        if self.closed.load(Ordering::Acquire) {
            return None;
        }
        let entry = entry_path(entry)?;
        let path = self.dir.join(entry);
        path.is_file().then_some(path)
    }
}

impl ContentRoot for DirectoryRoot {
    fn location(&self) -> &ContentLocation {
        &self.location
    }

    fn find_entry(&self, entry: &str) -> Option<Url> {
        let path = self.file_for(entry)?;
        Url::from_file_path(path).ok()
    }

    fn read_entry(&self, entry: &str) -> Option<Vec<u8>> {
        let path = self.file_for(entry)?;
        fs::read(path).ok()
    }

    fn entry_names(&self) -> Vec<String> {
        if self.closed.load(Ordering::Acquire) {
            return Vec::new();
        }
        let mut names: Vec<String> = WalkDir::new(&self.dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let rel = e.path().strip_prefix(&self.dir).ok()?;
                let parts: Vec<_> = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect();
                Some(parts.join("/"))
            })
            .collect();
        names.sort();
        names
    }

    fn close(&self) -> Result<(), ReleaseError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root_for(temp: &TempDir) -> DirectoryRoot {
        let url = Url::from_directory_path(temp.path()).unwrap();
        DirectoryRoot::new(temp.path().to_path_buf(), ContentLocation::directory(url))
    }

    #[test]
    fn test_find_and_read_entry() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("com/example")).unwrap();
        fs::write(temp.path().join("com/example/Foo.class"), b"cafe").unwrap();

        let root = root_for(&temp);
        let url = root.find_entry("com/example/Foo.class").unwrap();
        assert!(url.as_str().ends_with("com/example/Foo.class"));
        assert_eq!(root.read_entry("com/example/Foo.class").unwrap(), b"cafe");
        assert!(root.find_entry("com/example/Bar.class").is_none());
    }

    #[test]
    fn test_rejects_escaping_entries() {
        let temp = TempDir::new().unwrap();
        let inner = temp.path().join("inner");
        fs::create_dir_all(&inner).unwrap();
        fs::write(temp.path().join("secret.txt"), b"x").unwrap();

        let url = Url::from_directory_path(&inner).unwrap();
        let root = DirectoryRoot::new(inner, ContentLocation::directory(url));
        assert!(root.read_entry("../secret.txt").is_none());
    }

    #[test]
    fn test_close_hides_entries() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), b"a").unwrap();

        let root = root_for(&temp);
        assert_eq!(root.entry_names(), vec!["a.txt".to_string()]);

        root.close().unwrap();
        assert!(root.find_entry("a.txt").is_none());
        assert!(root.entry_names().is_empty());
    }
}
