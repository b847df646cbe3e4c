//! Error types for the registry layer.

use stackkit_file_store::FileStoreError;

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    /// The manifest is not valid JSON for the expected shape, or a
    /// descriptor is missing a required field.
    #[error("invalid feature manifest: {0}")]
    Parse(#[from] serde_json::Error),

    /// A feature id does not match the required kebab-case pattern.
    #[error("invalid feature id '{id}': {message}")]
    InvalidId { id: String, message: String },

    /// A feature lists itself as a dependency.
    #[error("feature '{feature}' must not depend on itself")]
    SelfDependency { feature: String },

    /// A feature lists a dependency id that is not in the manifest.
    #[error("feature '{feature}' depends on unknown feature '{dependency}'")]
    UnknownDependency { feature: String, dependency: String },

    /// The dependency graph contains a cycle; `feature` participates in it.
    #[error("dependency cycle involving feature '{feature}'")]
    DependencyCycle { feature: String },

    /// A lookup or resolution was requested for an unknown feature id.
    #[error("unknown feature '{id}'")]
    NotFound { id: String },

    /// The manifest could not be read from the file store.
    #[error("manifest read error: {0}")]
    Store(#[from] FileStoreError),
}
