//! Feature registry for stackkit.
//!
//! The registry loads the feature manifest, validates it (required fields,
//! known dependency ids, acyclic dependency graph), and answers dependency
//! and category queries. It performs no side effects: a [`Registry`] is an
//! immutable value constructed once and passed by reference to whoever
//! needs it.

mod descriptor;
mod error;
mod registry;

pub use descriptor::FeatureDescriptor;
pub use error::RegistryError;
pub use registry::Registry;

/// File name of the feature manifest inside the source directory.
pub const MANIFEST_FILE_NAME: &str = "features.json";
