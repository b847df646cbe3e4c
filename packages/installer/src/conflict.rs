//! Conflict candidates, resolutions, and the per-kind decision tables.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// How a caller resolved one conflicting target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Resolution {
    Overwrite,
    Skip,
}

/// One target path surfaced during conflict analysis.
///
/// Candidates exist only between analysis and apply; they are never
/// persisted. The caller annotates each with a [`Resolution`] before
/// installation; an unannotated candidate is treated as skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictCandidate {
    pub path: PathBuf,
    pub exists_on_disk: bool,
    pub resolution: Option<Resolution>,
}

impl ConflictCandidate {
    /// A candidate for a target path that already exists on disk.
    pub fn existing(path: PathBuf) -> Self {
        Self {
            path,
            exists_on_disk: true,
            resolution: None,
        }
    }

    /// The same candidate with a resolution attached.
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }
}

/// Resolutions keyed by target path, as `install_feature` consumes them.
pub type Resolutions = BTreeMap<PathBuf, Resolution>;

/// Convert annotated candidates into a resolution map.
///
/// An entry the caller left unannotated becomes [`Resolution::Skip`]; this
/// is where the "no resolution means skip" rule of the conflict protocol
/// is enforced.
pub fn to_resolutions(candidates: &[ConflictCandidate]) -> Resolutions {
    candidates
        .iter()
        .map(|c| (c.path.clone(), c.resolution.unwrap_or(Resolution::Skip)))
        .collect()
}

/// Annotate every candidate with the same resolution.
pub fn resolve_all(candidates: &[ConflictCandidate], resolution: Resolution) -> Resolutions {
    candidates
        .iter()
        .map(|c| (c.path.clone(), resolution))
        .collect()
}

/// What the schema stage does with one template file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    /// Copy the template to the target, overwrite permitted.
    Write,
    /// Leave the target untouched and record it as skipped.
    Skip,
}

/// Decision table for one schema file, keyed by `(exists_on_disk,
/// resolution)`.
///
/// A schema is written unless its target was explicitly resolved as skip.
/// The `(true, None)` row also writes: targets that existed at analysis
/// time reach this table as skip already, via [`to_resolutions`].
pub fn schema_action(exists_on_disk: bool, resolution: Option<Resolution>) -> SchemaAction {
    match (exists_on_disk, resolution) {
        (_, Some(Resolution::Skip)) => SchemaAction::Skip,
        (_, Some(Resolution::Overwrite)) => SchemaAction::Write,
        (false, None) => SchemaAction::Write,
        (true, None) => SchemaAction::Write,
    }
}

/// What the function stage does with one template directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionAction {
    /// Scaffold the target directory first, then copy the template tree in.
    ScaffoldThenCopy,
    /// Copy the template tree over the existing directory, no scaffold call.
    CopyOver,
    /// Leave the target untouched and record it as skipped.
    Skip,
}

/// Decision table for one function directory, keyed by `(exists_on_disk,
/// resolution)`.
///
/// A missing target is always scaffolded then filled. An existing target is
/// only touched when explicitly resolved as overwrite; existing without a
/// resolution is skipped silently rather than treated as an error.
pub fn function_action(exists_on_disk: bool, resolution: Option<Resolution>) -> FunctionAction {
    match (exists_on_disk, resolution) {
        (_, Some(Resolution::Skip)) => FunctionAction::Skip,
        (false, _) => FunctionAction::ScaffoldThenCopy,
        (true, Some(Resolution::Overwrite)) => FunctionAction::CopyOver,
        (true, None) => FunctionAction::Skip,
    }
}
