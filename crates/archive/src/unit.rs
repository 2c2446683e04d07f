use crate::directory::DirectoryRoot;
use crate::entry_path;
use crate::error::{ArchiveError, Result};
use crate::manifest::{MANIFEST_PATH, Manifest};
use crate::scope::RootScope;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use unitloader_api::{ContentLocation, ResolverScope, UnitId, UnitSource};
use url::Url;

/// A unit deployed as an exploded directory.
pub struct DirectoryUnit {
    id: UnitId,
    root: PathBuf,
    header: Option<String>,
    primary: Arc<RootScope>,
}

impl DirectoryUnit {
    /// Open `root`, reading the classpath header from its manifest if present.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(ArchiveError::NotADirectory(root));
        }

        let id = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());

        let manifest_path = root.join(MANIFEST_PATH);
        let header = if manifest_path.is_file() {
            let text = fs::read_to_string(&manifest_path)?;
            Manifest::parse(&text).classpath().map(str::to_string)
        } else {
            debug!("No manifest in {}", root.display());
            None
        };

        let url = Url::from_directory_path(&root)
            .map_err(|_| ArchiveError::UnsupportedLocation(root.display().to_string()))?;
        let primary_root = DirectoryRoot::new(root.clone(), ContentLocation::directory(url));
        let primary = Arc::new(RootScope::new(
            format!("{}:primary", id),
            vec![Box::new(primary_root)],
        ));

        Ok(Self {
            id: UnitId::new(id),
            root,
            header,
            primary,
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = UnitId::new(id);
        self
    }

    /// Override the declared classpath header.
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl UnitSource for DirectoryUnit {
    fn id(&self) -> &UnitId {
        &self.id
    }

    fn classpath_header(&self) -> Option<String> {
        self.header.clone()
    }

    fn entry_location(&self, entry: &str) -> Option<String> {
        let entry = entry_path(entry)?;
        let path = self.root.join(entry);
        let url = if path.is_dir() {
            Url::from_directory_path(&path).ok()?
        } else if path.is_file() {
            Url::from_file_path(&path).ok()?
        } else {
            return None;
        };
        Some(url.to_string())
    }

    fn primary_scope(&self) -> Option<Arc<dyn ResolverScope>> {
        Some(self.primary.clone())
    }
}
