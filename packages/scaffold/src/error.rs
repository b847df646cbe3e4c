//! Error types for the scaffolding layer.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ScaffoldError {
    /// The tool cannot operate (missing project directory, tool absent).
    #[error("scaffold tool is not available: {message}")]
    Unavailable { message: String },

    /// I/O failure creating an artifact.
    #[error("scaffold io error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
