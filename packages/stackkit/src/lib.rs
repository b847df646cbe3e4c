//! stackkit: install feature bundles into a project.
//!
//! A feature is a named, versioned bundle of schema, migration, function,
//! and seed templates. stackkit resolves inter-feature dependencies,
//! surfaces file-path conflicts for resolution, applies the four artifact
//! stages in a fixed order with per-item failure isolation, and tracks
//! installed state so features can be reinstalled safely.
//!
//! This crate re-exports the public surface of the layered packages.

pub use stackkit_config::{
    ConfigError, ConfigStore, InstalledRecord, JsonConfigStore, MemoryConfigStore,
    CONFIG_FILE_NAME, DEFAULT_SOURCE_DIR,
};
pub use stackkit_file_store::{FileStore, FileStoreError, LocalFileStore, MemoryFileStore};
pub use stackkit_installer::{
    function_action, resolve_all, schema_action, seed, to_resolutions, ConflictCandidate,
    DependencyCheck, FeatureTemplates, FunctionAction, InstallOutcome, Installer, InstallerError,
    ProjectLayout, Resolution, Resolutions, SchemaAction,
};
pub use stackkit_registry::{
    FeatureDescriptor, Registry, RegistryError, MANIFEST_FILE_NAME,
};
pub use stackkit_scaffold::{LocalScaffold, ScaffoldError, ScaffoldTool};
