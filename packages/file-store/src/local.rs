//! Local-disk file store rooted at a project directory.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::{FileStore, FileStoreError};

/// A [`FileStore`] backed by a directory on disk.
///
/// The root must exist, be a directory, and be writable; it is canonicalized
/// on construction. Store paths are resolved against the root and must stay
/// inside it: absolute paths and `..` components are rejected.
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: PathBuf) -> Result<LocalFileStore, FileStoreError> {
        let attr = fs::metadata(&root).map_err(|source| FileStoreError::InvalidRoot {
            path: root.clone(),
            message: source.to_string(),
        })?;

        if !attr.is_dir() {
            return Err(FileStoreError::InvalidRoot {
                path: root,
                message: "root path must be a directory".to_string(),
            });
        }

        if attr.permissions().readonly() {
            return Err(FileStoreError::InvalidRoot {
                path: root,
                message: "root directory must be writable".to_string(),
            });
        }

        match root.canonicalize() {
            Ok(root) => Ok(LocalFileStore { root }),
            Err(source) => Err(FileStoreError::InvalidRoot {
                path: root,
                message: source.to_string(),
            }),
        }
    }

    /// The canonicalized root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf, FileStoreError> {
        if path.is_absolute() {
            return Err(FileStoreError::invalid_path(
                path,
                "store paths must be relative to the root",
            ));
        }
        for component in path.components() {
            if matches!(component, Component::ParentDir) {
                return Err(FileStoreError::invalid_path(
                    path,
                    "store paths must not contain '..'",
                ));
            }
        }
        Ok(self.root.join(path))
    }

    fn ensure_parent(&self, full: &Path, store_path: &Path) -> Result<(), FileStoreError> {
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|source| FileStoreError::io(store_path, source))?;
        }
        Ok(())
    }

    fn sorted_entries(
        &self,
        dir: &Path,
        want_dirs: bool,
    ) -> Result<Vec<PathBuf>, FileStoreError> {
        let full = self.resolve(dir)?;
        if !full.is_dir() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        let entries = fs::read_dir(&full).map_err(|source| FileStoreError::io(dir, source))?;
        for entry in entries {
            let entry = entry.map_err(|source| FileStoreError::io(dir, source))?;
            let file_type = entry
                .file_type()
                .map_err(|source| FileStoreError::io(dir, source))?;
            if file_type.is_dir() == want_dirs {
                out.push(dir.join(entry.file_name()));
            }
        }
        out.sort();
        Ok(out)
    }
}

impl FileStore for LocalFileStore {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).map(|p| p.exists()).unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve(path).map(|p| p.is_dir()).unwrap_or(false)
    }

    fn read_to_string(&self, path: &Path) -> Result<String, FileStoreError> {
        let full = self.resolve(path)?;
        if !full.exists() {
            return Err(FileStoreError::NotFound {
                path: path.to_path_buf(),
            });
        }
        fs::read_to_string(&full).map_err(|source| FileStoreError::io(path, source))
    }

    fn write(&mut self, path: &Path, contents: &str) -> Result<(), FileStoreError> {
        let full = self.resolve(path)?;
        self.ensure_parent(&full, path)?;
        log::debug!("writing {}", full.display());
        fs::write(&full, contents).map_err(|source| FileStoreError::io(path, source))
    }

    fn copy(&mut self, from: &Path, to: &Path) -> Result<(), FileStoreError> {
        let src = self.resolve(from)?;
        if !src.is_file() {
            return Err(FileStoreError::NotFound {
                path: from.to_path_buf(),
            });
        }
        let dst = self.resolve(to)?;
        self.ensure_parent(&dst, to)?;
        log::debug!("copying {} -> {}", src.display(), dst.display());
        fs::copy(&src, &dst)
            .map(|_| ())
            .map_err(|source| FileStoreError::io(to, source))
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<(), FileStoreError> {
        let full = self.resolve(path)?;
        fs::create_dir_all(&full).map_err(|source| FileStoreError::io(path, source))
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, FileStoreError> {
        self.sorted_entries(dir, false)
    }

    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>, FileStoreError> {
        self.sorted_entries(dir, true)
    }

    fn walk_files(&self, dir: &Path) -> Result<Vec<PathBuf>, FileStoreError> {
        let full = self.resolve(dir)?;
        if !full.is_dir() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for entry in walkdir::WalkDir::new(&full).sort_by_file_name() {
            let entry = entry.map_err(|source| FileStoreError::io(dir, io::Error::other(source)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(&self.root).map_err(|_| {
                FileStoreError::invalid_path(entry.path(), "walked entry outside store root")
            })?;
            out.push(relative.to_path_buf());
        }
        out.sort();
        Ok(out)
    }
}
