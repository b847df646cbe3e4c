//! Feature descriptors as declared in the manifest.

use serde::{Deserialize, Serialize};

/// One feature as the manifest declares it.
///
/// `dependencies` preserves declaration order; resolution visits them in
/// exactly that order, so closure output is deterministic for a given
/// manifest. `version` is an opaque label and is never compared for
/// ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub category: String,
}
