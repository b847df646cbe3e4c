//! A feature's template tree under the source directory.

use std::path::{Path, PathBuf};

use stackkit_file_store::{FileStore, FileStoreError};

const SCHEMAS_DIR: &str = "schemas";
const MIGRATIONS_DIR: &str = "migrations";
const FUNCTIONS_DIR: &str = "functions";
const SEED_DIR: &str = "seed";

/// Template locations for one feature: `<source_dir>/<feature-id>/` with
/// optional `schemas/`, `migrations/`, `functions/<name>/` and `seed/`
/// subtrees. All enumeration goes through the file store, so a missing
/// subtree is simply empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureTemplates {
    root: PathBuf,
}

impl FeatureTemplates {
    pub fn new(source_dir: &Path, feature_id: &str) -> Self {
        Self {
            root: source_dir.join(feature_id),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Schema template files, flat and sorted.
    pub fn schema_files<F: FileStore + ?Sized>(
        &self,
        store: &F,
    ) -> Result<Vec<PathBuf>, FileStoreError> {
        store.list_files(&self.root.join(SCHEMAS_DIR))
    }

    /// Migration template files, flat and sorted.
    pub fn migration_files<F: FileStore + ?Sized>(
        &self,
        store: &F,
    ) -> Result<Vec<PathBuf>, FileStoreError> {
        store.list_files(&self.root.join(MIGRATIONS_DIR))
    }

    /// Top-level function template directories, sorted.
    pub fn function_dirs<F: FileStore + ?Sized>(
        &self,
        store: &F,
    ) -> Result<Vec<PathBuf>, FileStoreError> {
        store.list_dirs(&self.root.join(FUNCTIONS_DIR))
    }

    /// Seed template files, flat and sorted.
    pub fn seed_files<F: FileStore + ?Sized>(
        &self,
        store: &F,
    ) -> Result<Vec<PathBuf>, FileStoreError> {
        store.list_files(&self.root.join(SEED_DIR))
    }

    pub fn has_schemas<F: FileStore + ?Sized>(&self, store: &F) -> bool {
        matches!(self.schema_files(store), Ok(files) if !files.is_empty())
    }

    pub fn has_migrations<F: FileStore + ?Sized>(&self, store: &F) -> bool {
        matches!(self.migration_files(store), Ok(files) if !files.is_empty())
    }

    pub fn has_functions<F: FileStore + ?Sized>(&self, store: &F) -> bool {
        matches!(self.function_dirs(store), Ok(dirs) if !dirs.is_empty())
    }

    pub fn has_seeds<F: FileStore + ?Sized>(&self, store: &F) -> bool {
        matches!(self.seed_files(store), Ok(files) if !files.is_empty())
    }
}
