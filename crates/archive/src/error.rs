use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Unsupported location: {0}")]
    UnsupportedLocation(String),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
