//! Error types for the file store layer.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum FileStoreError {
    /// I/O failure while operating on a path.
    #[error("io error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store root is missing, not a directory, or not writable.
    #[error("invalid store root '{}': {message}", .path.display())]
    InvalidRoot { path: PathBuf, message: String },

    /// A path that must exist does not.
    #[error("'{}' not found", .path.display())]
    NotFound { path: PathBuf },

    /// A path escaping the store root or otherwise unusable.
    #[error("invalid path '{}': {message}", .path.display())]
    InvalidPath { path: PathBuf, message: String },
}

impl FileStoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FileStoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_path(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        FileStoreError::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }
}
