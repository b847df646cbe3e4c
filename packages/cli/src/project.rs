//! Opening a project: stores, scaffold, and registry from a root directory.

use std::path::Path;

use stackkit_config::{ConfigError, ConfigStore, JsonConfigStore};
use stackkit_file_store::{FileStoreError, LocalFileStore};
use stackkit_installer::InstallerError;
use stackkit_registry::{Registry, RegistryError, MANIFEST_FILE_NAME};
use stackkit_scaffold::LocalScaffold;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] FileStoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Installer(#[from] InstallerError),
}

/// Everything a command needs, opened from the project root.
pub struct ProjectParts {
    pub registry: Registry,
    pub files: LocalFileStore,
    pub config: JsonConfigStore,
    pub scaffold: LocalScaffold,
}

/// Open the file store, configuration, scaffold, and registry for a root.
///
/// The manifest is expected at `<source_dir>/features.json`, with
/// `source_dir` taken from the project configuration.
pub fn open(root: &Path) -> Result<ProjectParts, CliError> {
    let files = LocalFileStore::new(root.to_path_buf())?;
    let config = JsonConfigStore::open(root)?;
    let manifest_path = config.source_dir().join(MANIFEST_FILE_NAME);
    let registry = Registry::load(&files, &manifest_path)?;
    let scaffold = LocalScaffold::new(root.to_path_buf());

    Ok(ProjectParts {
        registry,
        files,
        config,
        scaffold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn open_reads_manifest_from_configured_source_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("stackkit.json"),
            r#"{ "sourceDir": "bundles" }"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("bundles")).unwrap();
        fs::write(
            dir.path().join("bundles/features.json"),
            r#"{ "version": "1", "features": {} }"#,
        )
        .unwrap();

        let parts = open(dir.path()).unwrap();
        assert_eq!(parts.registry.version(), "1");
        assert_eq!(parts.config.source_dir(), Path::new("bundles"));
    }

    #[test]
    fn open_without_manifest_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = open(dir.path());
        assert!(matches!(result, Err(CliError::Registry(_))));
    }
}
