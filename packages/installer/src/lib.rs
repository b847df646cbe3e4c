//! Feature installer for stackkit.
//!
//! Installation of one feature runs as a fixed pipeline:
//! analyze conflicts, then apply the four artifact stages in order
//! (schema, migration, function, seed), then persist the install record.
//! Stage items fail independently: a broken migration template never stops
//! an unrelated function from installing, and every stage is attempted
//! regardless of errors in earlier ones. Only the final outcome says
//! whether anything went wrong.

mod conflict;
mod error;
mod installer;
mod layout;
mod outcome;
pub mod seed;
mod templates;

pub use conflict::{
    function_action, resolve_all, schema_action, to_resolutions, ConflictCandidate,
    FunctionAction, Resolution, Resolutions, SchemaAction,
};
pub use error::InstallerError;
pub use installer::{DependencyCheck, Installer};
pub use layout::ProjectLayout;
pub use outcome::InstallOutcome;
pub use templates::FeatureTemplates;
