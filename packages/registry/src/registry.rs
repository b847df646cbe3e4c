//! Manifest loading, validation, and dependency-closure resolution.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use stackkit_file_store::FileStore;

use crate::{FeatureDescriptor, RegistryError};

lazy_static! {
    static ref FEATURE_ID: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// Wire shape of the feature manifest.
#[derive(Debug, Deserialize)]
struct ManifestFile {
    version: String,
    features: BTreeMap<String, FeatureDescriptor>,
}

/// The validated feature registry.
///
/// Construction validates the whole manifest, so a `Registry` value always
/// satisfies: every feature id is well-formed, every declared dependency
/// exists, no feature depends on itself, and the dependency graph is
/// acyclic. Queries can therefore assume those invariants.
#[derive(Debug, Clone)]
pub struct Registry {
    version: String,
    features: BTreeMap<String, FeatureDescriptor>,
}

impl Registry {
    /// Parse and validate a manifest from a JSON string.
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let file: ManifestFile = serde_json::from_str(raw)?;

        let mut features = file.features;
        for (id, descriptor) in features.iter_mut() {
            descriptor.id = id.clone();
        }

        let registry = Registry {
            version: file.version,
            features,
        };
        registry.validate()?;
        log::debug!(
            "loaded feature registry v{} with {} features",
            registry.version,
            registry.features.len()
        );
        Ok(registry)
    }

    /// Read, parse, and validate the manifest at a store path.
    pub fn load<F: FileStore + ?Sized>(
        store: &F,
        manifest_path: &Path,
    ) -> Result<Self, RegistryError> {
        let raw = store.read_to_string(manifest_path)?;
        Self::parse(&raw)
    }

    /// Manifest version label.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// A feature by id.
    pub fn get_feature(&self, id: &str) -> Option<&FeatureDescriptor> {
        self.features.get(id)
    }

    /// All feature ids, sorted.
    pub fn feature_ids(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    /// Features declaring the given category, sorted by id.
    pub fn features_by_category(&self, category: &str) -> Vec<&FeatureDescriptor> {
        self.features
            .values()
            .filter(|f| f.category == category)
            .collect()
    }

    /// Every category present in the manifest, sorted and deduplicated.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .features
            .values()
            .map(|f| f.category.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        categories.sort();
        categories
    }

    /// The full transitive dependency closure of `id`, dependency-first,
    /// duplicate-free, ending with `id` itself.
    ///
    /// Dependencies are visited in declaration order; a feature already
    /// resolved earlier in the same call is not revisited.
    pub fn resolve_dependencies(&self, id: &str) -> Result<Vec<String>, RegistryError> {
        if !self.features.contains_key(id) {
            return Err(RegistryError::NotFound { id: id.to_string() });
        }

        let mut seen = HashSet::new();
        let mut order = Vec::new();
        self.collect_closure(id, &mut seen, &mut order);
        Ok(order)
    }

    fn collect_closure(&self, id: &str, seen: &mut HashSet<String>, order: &mut Vec<String>) {
        if !seen.insert(id.to_string()) {
            return;
        }
        // Validation guarantees the id exists and the graph is acyclic.
        if let Some(feature) = self.features.get(id) {
            for dependency in &feature.dependencies {
                self.collect_closure(dependency, seen, order);
            }
        }
        order.push(id.to_string());
    }

    fn validate(&self) -> Result<(), RegistryError> {
        for (id, feature) in &self.features {
            if !FEATURE_ID.is_match(id) {
                return Err(RegistryError::InvalidId {
                    id: id.clone(),
                    message: "feature ids are lowercase kebab-case".to_string(),
                });
            }
            for dependency in &feature.dependencies {
                if dependency == id {
                    return Err(RegistryError::SelfDependency {
                        feature: id.clone(),
                    });
                }
                if !self.features.contains_key(dependency) {
                    return Err(RegistryError::UnknownDependency {
                        feature: id.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }
        self.check_cycles()
    }

    /// Three-state traversal: a feature absent from `states` is unvisited,
    /// `InProgress` while its dependency subtree is being walked, `Done`
    /// afterwards. Revisiting an `InProgress` feature proves a cycle, and
    /// that feature is the reported participant.
    fn check_cycles(&self) -> Result<(), RegistryError> {
        let mut states: HashMap<&str, VisitState> = HashMap::new();
        for id in self.features.keys() {
            self.visit(id, &mut states)?;
        }
        Ok(())
    }

    fn visit<'a>(
        &'a self,
        id: &'a str,
        states: &mut HashMap<&'a str, VisitState>,
    ) -> Result<(), RegistryError> {
        match states.get(id) {
            Some(VisitState::InProgress) => {
                return Err(RegistryError::DependencyCycle {
                    feature: id.to_string(),
                });
            }
            Some(VisitState::Done) => return Ok(()),
            None => {}
        }

        states.insert(id, VisitState::InProgress);
        if let Some(feature) = self.features.get(id) {
            for dependency in &feature.dependencies {
                self.visit(dependency, states)?;
            }
        }
        states.insert(id, VisitState::Done);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}
