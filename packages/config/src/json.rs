//! Disk-backed configuration store reading and writing `stackkit.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, ConfigStore, InstalledRecord, CONFIG_FILE_NAME, DEFAULT_SOURCE_DIR,
};

/// Wire shape of `stackkit.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_dir: Option<PathBuf>,
    installed: BTreeMap<String, InstalledRecord>,
}

/// A [`ConfigStore`] backed by `stackkit.json` at the project root.
///
/// The file is read once on open; a missing file yields defaults. `persist`
/// rewrites the whole file, so the record replacement for a feature id is
/// last-write-wins and never partially visible within the process.
pub struct JsonConfigStore {
    config_path: PathBuf,
    prefix: Option<String>,
    source_dir: PathBuf,
    installed: BTreeMap<String, InstalledRecord>,
}

impl JsonConfigStore {
    /// Open the configuration for a project root.
    pub fn open(project_root: &Path) -> Result<Self, ConfigError> {
        let config_path = project_root.join(CONFIG_FILE_NAME);

        let file = if config_path.exists() {
            let raw = fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
                path: config_path.clone(),
                source,
            })?;
            serde_json::from_str::<ConfigFile>(&raw)?
        } else {
            log::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
            ConfigFile::default()
        };

        Ok(Self {
            config_path,
            prefix: file.prefix,
            source_dir: file
                .source_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR)),
            installed: file.installed,
        })
    }

    /// Where the configuration file lives.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn save(&self) -> Result<(), ConfigError> {
        let file = ConfigFile {
            prefix: self.prefix.clone(),
            source_dir: Some(self.source_dir.clone()),
            installed: self.installed.clone(),
        };
        let raw = serde_json::to_string_pretty(&file)?;
        log::debug!("writing {}", self.config_path.display());
        fs::write(&self.config_path, raw).map_err(|source| ConfigError::Io {
            path: self.config_path.clone(),
            source,
        })
    }
}

impl ConfigStore for JsonConfigStore {
    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    fn installed(&self) -> &BTreeMap<String, InstalledRecord> {
        &self.installed
    }

    fn persist(&mut self, feature_id: &str, record: InstalledRecord) -> Result<(), ConfigError> {
        self.installed.insert(feature_id.to_string(), record);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConfigStore::open(dir.path()).unwrap();
        assert_eq!(store.prefix(), None);
        assert_eq!(store.source_dir(), Path::new(DEFAULT_SOURCE_DIR));
        assert!(store.installed().is_empty());
    }

    #[test]
    fn reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{
                "prefix": "acme_",
                "sourceDir": "bundles",
                "installed": {
                    "auth": {
                        "version": "1.0.0",
                        "installedAt": "2024-06-01T12:00:00Z",
                        "files": ["schemas/acme_users.sql"]
                    }
                }
            }"#,
        )
        .unwrap();

        let store = JsonConfigStore::open(dir.path()).unwrap();
        assert_eq!(store.prefix(), Some("acme_"));
        assert_eq!(store.source_dir(), Path::new("bundles"));
        assert!(store.is_installed("auth"));
        assert_eq!(
            store.record("auth").unwrap().files,
            vec!["schemas/acme_users.sql".to_string()]
        );
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{not json").unwrap();
        let result = JsonConfigStore::open(dir.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn persist_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let mut store = JsonConfigStore::open(dir.path()).unwrap();
            store
                .persist(
                    "storage",
                    InstalledRecord::new("0.2.0", vec!["seed.sql".to_string()]),
                )
                .unwrap();
        }

        let store = JsonConfigStore::open(dir.path()).unwrap();
        let record = store.record("storage").unwrap();
        assert_eq!(record.version, "0.2.0");
        assert_eq!(record.files, vec!["seed.sql".to_string()]);
    }

    #[test]
    fn persist_replaces_prior_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonConfigStore::open(dir.path()).unwrap();

        store
            .persist(
                "auth",
                InstalledRecord::new("1.0.0", vec!["old.sql".to_string()]),
            )
            .unwrap();
        store
            .persist(
                "auth",
                InstalledRecord::new("1.1.0", vec!["new.sql".to_string()]),
            )
            .unwrap();

        let reopened = JsonConfigStore::open(dir.path()).unwrap();
        let record = reopened.record("auth").unwrap();
        assert_eq!(record.version, "1.1.0");
        assert_eq!(record.files, vec!["new.sql".to_string()]);
    }
}
