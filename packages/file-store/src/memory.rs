//! In-memory file store for tests and embedding.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use crate::{FileStore, FileStoreError};

/// A [`FileStore`] holding files in memory.
///
/// Files are UTF-8 strings keyed by normalized relative path. Writing a file
/// implicitly creates its ancestor directories, matching how the local store
/// behaves on disk.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use stackkit_file_store::{FileStore, MemoryFileStore};
///
/// let mut store = MemoryFileStore::new();
/// store.write(Path::new("schemas/users.sql"), "create table users;").unwrap();
/// assert!(store.is_dir(Path::new("schemas")));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryFileStore {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryFileStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files currently held.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn normalize(path: &Path) -> Result<PathBuf, FileStoreError> {
        if path.is_absolute() {
            return Err(FileStoreError::invalid_path(
                path,
                "store paths must be relative to the root",
            ));
        }
        let mut out = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(c) => out.push(c),
                Component::CurDir => {}
                _ => {
                    return Err(FileStoreError::invalid_path(
                        path,
                        "store paths must not contain '..'",
                    ));
                }
            }
        }
        Ok(out)
    }

    fn record_ancestors(&mut self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if !dir.as_os_str().is_empty() {
                self.dirs.insert(dir.to_path_buf());
            }
            current = dir.parent();
        }
    }
}

impl FileStore for MemoryFileStore {
    fn exists(&self, path: &Path) -> bool {
        match Self::normalize(path) {
            Ok(p) => self.files.contains_key(&p) || self.dirs.contains(&p),
            Err(_) => false,
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        match Self::normalize(path) {
            Ok(p) => self.dirs.contains(&p),
            Err(_) => false,
        }
    }

    fn read_to_string(&self, path: &Path) -> Result<String, FileStoreError> {
        let p = Self::normalize(path)?;
        self.files
            .get(&p)
            .cloned()
            .ok_or(FileStoreError::NotFound { path: p })
    }

    fn write(&mut self, path: &Path, contents: &str) -> Result<(), FileStoreError> {
        let p = Self::normalize(path)?;
        self.record_ancestors(&p);
        self.files.insert(p, contents.to_string());
        Ok(())
    }

    fn copy(&mut self, from: &Path, to: &Path) -> Result<(), FileStoreError> {
        let contents = self.read_to_string(from)?;
        self.write(to, &contents)
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<(), FileStoreError> {
        let p = Self::normalize(path)?;
        self.record_ancestors(&p);
        if !p.as_os_str().is_empty() {
            self.dirs.insert(p);
        }
        Ok(())
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, FileStoreError> {
        let d = Self::normalize(dir)?;
        Ok(self
            .files
            .keys()
            .filter(|p| p.parent() == Some(d.as_path()))
            .cloned()
            .collect())
    }

    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>, FileStoreError> {
        let d = Self::normalize(dir)?;
        Ok(self
            .dirs
            .iter()
            .filter(|p| p.parent() == Some(d.as_path()))
            .cloned()
            .collect())
    }

    fn walk_files(&self, dir: &Path) -> Result<Vec<PathBuf>, FileStoreError> {
        let d = Self::normalize(dir)?;
        Ok(self
            .files
            .keys()
            .filter(|p| p.starts_with(&d))
            .cloned()
            .collect())
    }
}
