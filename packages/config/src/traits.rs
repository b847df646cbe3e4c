//! The ConfigStore trait: what the installer reads and persists.

use std::collections::BTreeMap;
use std::path::Path;

use crate::{ConfigError, InstalledRecord};

/// Project configuration consumed by the installer.
///
/// Reads are synchronous; `persist` replaces the record for a feature id
/// wholesale (last write wins) and must never leave a partial record
/// visible to a reader in the same process.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn ConfigStore>`.
pub trait ConfigStore: Send + Sync {
    /// The naming prefix applied to produced artifacts, if configured.
    fn prefix(&self) -> Option<&str>;

    /// Project-relative root of the feature template tree.
    fn source_dir(&self) -> &Path;

    /// The installed-feature records, keyed by feature id.
    fn installed(&self) -> &BTreeMap<String, InstalledRecord>;

    /// Whether a feature id has an install record.
    fn is_installed(&self, id: &str) -> bool {
        self.installed().contains_key(id)
    }

    /// The install record for a feature id, if present.
    fn record(&self, id: &str) -> Option<&InstalledRecord> {
        self.installed().get(id)
    }

    /// Replace the record for a feature id and make it durable.
    fn persist(&mut self, feature_id: &str, record: InstalledRecord) -> Result<(), ConfigError>;
}

impl<T: ConfigStore + ?Sized> ConfigStore for &mut T {
    fn prefix(&self) -> Option<&str> {
        (**self).prefix()
    }

    fn source_dir(&self) -> &Path {
        (**self).source_dir()
    }

    fn installed(&self) -> &BTreeMap<String, InstalledRecord> {
        (**self).installed()
    }

    fn persist(&mut self, feature_id: &str, record: InstalledRecord) -> Result<(), ConfigError> {
        (**self).persist(feature_id, record)
    }
}

impl<T: ConfigStore + ?Sized> ConfigStore for Box<T> {
    fn prefix(&self) -> Option<&str> {
        self.as_ref().prefix()
    }

    fn source_dir(&self) -> &Path {
        self.as_ref().source_dir()
    }

    fn installed(&self) -> &BTreeMap<String, InstalledRecord> {
        self.as_ref().installed()
    }

    fn persist(&mut self, feature_id: &str, record: InstalledRecord) -> Result<(), ConfigError> {
        self.as_mut().persist(feature_id, record)
    }
}
