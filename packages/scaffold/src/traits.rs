//! The ScaffoldTool trait: canonical artifact creation.

use std::path::PathBuf;

use crate::ScaffoldError;

/// Creates canonically-named migration and function artifacts.
///
/// `create_migration` must produce a path whose identifier is monotonically
/// sortable and collision-free, because migrations form an append-only
/// historical log: an existing migration is never edited, replaced, or
/// deleted. `is_available` is checked once before any install attempt;
/// failures of the creation methods afterwards are per-item, never fatal to
/// the install as a whole.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn ScaffoldTool>`.
pub trait ScaffoldTool: Send + Sync {
    /// Whether the tool can operate at all.
    fn is_available(&self) -> bool;

    /// Create a new, empty migration artifact and return its
    /// project-relative path.
    fn create_migration(&mut self, name: &str) -> Result<PathBuf, ScaffoldError>;

    /// Create a function directory with conventional boilerplate.
    fn create_function(&mut self, name: &str) -> Result<(), ScaffoldError>;
}

impl<T: ScaffoldTool + ?Sized> ScaffoldTool for &mut T {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn create_migration(&mut self, name: &str) -> Result<PathBuf, ScaffoldError> {
        (**self).create_migration(name)
    }

    fn create_function(&mut self, name: &str) -> Result<(), ScaffoldError> {
        (**self).create_function(name)
    }
}

impl<T: ScaffoldTool + ?Sized> ScaffoldTool for Box<T> {
    fn is_available(&self) -> bool {
        self.as_ref().is_available()
    }

    fn create_migration(&mut self, name: &str) -> Result<PathBuf, ScaffoldError> {
        self.as_mut().create_migration(name)
    }

    fn create_function(&mut self, name: &str) -> Result<(), ScaffoldError> {
        self.as_mut().create_function(name)
    }
}
