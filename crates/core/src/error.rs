use thiserror::Error;
use unitloader_archive::ArchiveError;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Storage error: {0}")]
    Archive(#[from] ArchiveError),
}

pub type Result<T> = std::result::Result<T, LoaderError>;
