use crate::error::{BoxError, ReleaseError};
use crate::location::ContentLocation;
use url::Url;

/// An opened content location holding whatever handles it needs.
pub trait ContentRoot: Send + Sync {
    fn location(&self) -> &ContentLocation;

    /// URL of `entry` when it exists in this root.
    fn find_entry(&self, entry: &str) -> Option<Url>;

    fn read_entry(&self, entry: &str) -> Option<Vec<u8>>;

    /// Every entry name in the root, `/`-separated and relative.
    fn entry_names(&self) -> Vec<String>;

    /// Release held handles. Lookups miss afterwards.
    fn close(&self) -> Result<(), ReleaseError>;
}

/// Opens content locations into usable roots.
pub trait RootOpener: Send + Sync {
    fn open(&self, location: &ContentLocation) -> Result<Box<dyn ContentRoot>, BoxError>;
}
