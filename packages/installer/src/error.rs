//! Fatal installer errors.
//!
//! Only conditions that stop an install before (or instead of) running the
//! stage pipeline live here. Per-item stage failures and persist failures
//! are collected into [`crate::InstallOutcome::errors`] instead, so they
//! never abort sibling items or later stages.

use stackkit_config::ConfigError;
use stackkit_file_store::FileStoreError;
use stackkit_registry::RegistryError;

#[derive(thiserror::Error, Debug)]
pub enum InstallerError {
    /// The requested feature id is not in the registry.
    #[error("unknown feature '{id}'")]
    NotFound { id: String },

    /// The scaffold tool reported itself unavailable; checked once before
    /// any stage starts.
    #[error("scaffold tool is not available")]
    ToolUnavailable,

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("file store error: {0}")]
    Store(#[from] FileStoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let e = InstallerError::NotFound {
            id: "edge-fn-utils".to_string(),
        };
        assert!(format!("{}", e).contains("edge-fn-utils"));
    }

    #[test]
    fn registry_error_converts() {
        let e: InstallerError = RegistryError::NotFound {
            id: "x".to_string(),
        }
        .into();
        assert!(matches!(e, InstallerError::Registry(_)));
    }
}
