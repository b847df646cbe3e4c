//! In-memory configuration store for tests and embedding.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{ConfigError, ConfigStore, InstalledRecord, DEFAULT_SOURCE_DIR};

/// A [`ConfigStore`] held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryConfigStore {
    prefix: Option<String>,
    source_dir: PathBuf,
    installed: BTreeMap<String, InstalledRecord>,
}

impl MemoryConfigStore {
    /// Create a store with no prefix and the default source directory.
    pub fn new() -> Self {
        Self {
            prefix: None,
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            installed: BTreeMap::new(),
        }
    }

    /// Set the naming prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the source-directory root.
    pub fn with_source_dir(mut self, source_dir: impl Into<PathBuf>) -> Self {
        self.source_dir = source_dir.into();
        self
    }
}

impl Default for MemoryConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for MemoryConfigStore {
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
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let store = MemoryConfigStore::new();
        assert_eq!(store.prefix(), None);
        assert_eq!(store.source_dir(), Path::new(DEFAULT_SOURCE_DIR));
        assert!(store.installed().is_empty());
    }

    #[test]
    fn builder_setters() {
        let store = MemoryConfigStore::new()
            .with_prefix("acme_")
            .with_source_dir("bundles");
        assert_eq!(store.prefix(), Some("acme_"));
        assert_eq!(store.source_dir(), Path::new("bundles"));
    }

    #[test]
    fn persist_replaces_wholesale() {
        let mut store = MemoryConfigStore::new();
        store
            .persist(
                "auth",
                InstalledRecord::new("1.0.0", vec!["a.sql".to_string()]),
            )
            .unwrap();
        store
            .persist(
                "auth",
                InstalledRecord::new("1.1.0", vec!["b.sql".to_string()]),
            )
            .unwrap();

        let record = store.record("auth").unwrap();
        assert_eq!(record.version, "1.1.0");
        assert_eq!(record.files, vec!["b.sql".to_string()]);
    }
}
