//! The staged installer: analyze, apply four stages, persist.

use std::path::{Path, PathBuf};

use stackkit_config::{ConfigStore, InstalledRecord};
use stackkit_file_store::FileStore;
use stackkit_registry::{FeatureDescriptor, Registry};
use stackkit_scaffold::ScaffoldTool;

use crate::conflict::{
    function_action, resolve_all, schema_action, ConflictCandidate, FunctionAction, Resolution,
    Resolutions, SchemaAction,
};
use crate::seed;
use crate::templates::FeatureTemplates;
use crate::{InstallOutcome, InstallerError, ProjectLayout};

/// Result of checking a feature's declared dependencies against the
/// installed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyCheck {
    pub satisfied: bool,
    pub missing: Vec<String>,
}

impl DependencyCheck {
    pub fn new(missing: Vec<String>) -> Self {
        Self {
            satisfied: missing.is_empty(),
            missing,
        }
    }
}

/// Installs features into a project.
///
/// One installer value serves one project: it holds the file store rooted at
/// the project, the project configuration, and the scaffold tool, plus a
/// reference to the validated [`Registry`]. Execution is strictly
/// sequential; the stages of one install run in fixed order and a
/// dependency's install runs to completion before the next begins.
pub struct Installer<'r, F, C, S> {
    registry: &'r Registry,
    files: F,
    config: C,
    scaffold: S,
    layout: ProjectLayout,
}

impl<'r, F, C, S> Installer<'r, F, C, S>
where
    F: FileStore,
    C: ConfigStore,
    S: ScaffoldTool,
{
    pub fn new(registry: &'r Registry, files: F, config: C, scaffold: S) -> Self {
        Self {
            registry,
            files,
            config,
            scaffold,
            layout: ProjectLayout::default(),
        }
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn files(&self) -> &F {
        &self.files
    }

    pub fn scaffold(&self) -> &S {
        &self.scaffold
    }

    /// Which of a feature's declared dependencies are not yet installed.
    pub fn check_dependencies(&self, id: &str) -> Result<DependencyCheck, InstallerError> {
        let feature = self.feature(id)?;
        let missing = feature
            .dependencies
            .iter()
            .filter(|dependency| !self.config.is_installed(dependency))
            .cloned()
            .collect();
        Ok(DependencyCheck::new(missing))
    }

    /// Target paths of the feature that already exist on disk.
    ///
    /// Only schema files and top-level function directories participate:
    /// migrations always produce a fresh artifact and the seed merge is
    /// append-only and self-deduplicating, so neither can conflict.
    pub fn analyze_conflicts(&self, id: &str) -> Result<Vec<ConflictCandidate>, InstallerError> {
        self.feature(id)?;
        let prefix = self.prefix();
        let templates = self.templates(id);

        let mut candidates = Vec::new();
        for template in templates.schema_files(&self.files)? {
            if let Some(target) = self.schema_target(&template, &prefix) {
                if self.files.exists(&target) {
                    candidates.push(ConflictCandidate::existing(target));
                }
            }
        }
        for template_dir in templates.function_dirs(&self.files)? {
            if let Some(target) = self.function_target(&template_dir, &prefix) {
                if self.files.exists(&target) {
                    candidates.push(ConflictCandidate::existing(target));
                }
            }
        }
        Ok(candidates)
    }

    /// Run the full staged install for one feature.
    ///
    /// Every stage is attempted regardless of errors in earlier stages;
    /// per-item failures land in the outcome's `errors`. The install record
    /// is persisted only after all four stages have run, replacing any
    /// prior record for the id, and a persist failure is itself recorded as
    /// an error because later commands depend on that record.
    pub fn install_feature(
        &mut self,
        id: &str,
        resolutions: &Resolutions,
    ) -> Result<InstallOutcome, InstallerError> {
        let version = self.feature(id)?.version.clone();
        if !self.scaffold.is_available() {
            return Err(InstallerError::ToolUnavailable);
        }

        let prefix = self.prefix();
        let templates = self.templates(id);
        log::debug!("installing feature '{}'", id);

        let mut outcome = InstallOutcome::default();
        self.apply_schemas(&templates, &prefix, resolutions, &mut outcome);
        self.apply_migrations(&templates, &prefix, &mut outcome);
        self.apply_functions(&templates, &prefix, resolutions, &mut outcome);
        self.apply_seeds(id, &templates, &mut outcome);
        self.persist_record(id, &version, &mut outcome);
        Ok(outcome)
    }

    /// Install a feature's missing dependencies, then the feature itself.
    ///
    /// Closure members are installed strictly in resolution order, each to
    /// completion before the next. Conflicts of auto-installed dependencies
    /// are forced to overwrite; only the target feature uses the caller's
    /// resolutions. Returns one `(feature id, outcome)` pair per install
    /// performed, target last.
    pub fn install_with_dependencies(
        &mut self,
        id: &str,
        resolutions: &Resolutions,
    ) -> Result<Vec<(String, InstallOutcome)>, InstallerError> {
        let closure = self.registry.resolve_dependencies(id)?;

        let mut results = Vec::new();
        for member in closure {
            let outcome = if member == id {
                self.install_feature(&member, resolutions)?
            } else if self.config.is_installed(&member) {
                log::debug!("dependency '{}' already installed", member);
                continue;
            } else {
                let conflicts = self.analyze_conflicts(&member)?;
                let forced = resolve_all(&conflicts, Resolution::Overwrite);
                self.install_feature(&member, &forced)?
            };
            results.push((member, outcome));
        }
        Ok(results)
    }

    pub fn has_schemas(&self, id: &str) -> bool {
        self.templates(id).has_schemas(&self.files)
    }

    pub fn has_migrations(&self, id: &str) -> bool {
        self.templates(id).has_migrations(&self.files)
    }

    pub fn has_functions(&self, id: &str) -> bool {
        self.templates(id).has_functions(&self.files)
    }

    pub fn has_seeds(&self, id: &str) -> bool {
        self.templates(id).has_seeds(&self.files)
    }

    fn feature(&self, id: &str) -> Result<&FeatureDescriptor, InstallerError> {
        self.registry
            .get_feature(id)
            .ok_or_else(|| InstallerError::NotFound { id: id.to_string() })
    }

    fn prefix(&self) -> String {
        self.config.prefix().unwrap_or_default().to_string()
    }

    fn templates(&self, id: &str) -> FeatureTemplates {
        FeatureTemplates::new(self.config.source_dir(), id)
    }

    /// The single point where a template's base name becomes a prefixed
    /// target name. Construction always starts from the unprefixed template
    /// name, so the prefix cannot be applied twice.
    fn prefixed_name(prefix: &str, template: &Path) -> Option<String> {
        template
            .file_name()
            .map(|name| format!("{}{}", prefix, name.to_string_lossy()))
    }

    fn schema_target(&self, template: &Path, prefix: &str) -> Option<PathBuf> {
        Self::prefixed_name(prefix, template).map(|name| self.layout.schemas_dir().join(name))
    }

    fn function_target(&self, template_dir: &Path, prefix: &str) -> Option<PathBuf> {
        Self::prefixed_name(prefix, template_dir).map(|name| self.layout.functions_dir().join(name))
    }

    fn migration_name(template: &Path, prefix: &str) -> Option<String> {
        template
            .file_stem()
            .map(|stem| format!("{}{}", prefix, stem.to_string_lossy()))
    }

    fn apply_schemas(
        &mut self,
        templates: &FeatureTemplates,
        prefix: &str,
        resolutions: &Resolutions,
        outcome: &mut InstallOutcome,
    ) {
        let files = match templates.schema_files(&self.files) {
            Ok(files) => files,
            Err(e) => {
                outcome.record_error(format!("schema enumeration failed: {}", e));
                return;
            }
        };

        for template in files {
            let Some(target) = self.schema_target(&template, prefix) else {
                outcome.record_error(format!(
                    "schema '{}' has no usable file name",
                    template.display()
                ));
                continue;
            };

            let exists = self.files.exists(&target);
            match schema_action(exists, resolutions.get(&target).copied()) {
                SchemaAction::Skip => outcome.record_skipped(target),
                SchemaAction::Write => match self.files.copy(&template, &target) {
                    Ok(()) => outcome.record_installed(target),
                    Err(e) => {
                        outcome.record_error(format!("schema '{}': {}", template.display(), e));
                    }
                },
            }
        }
    }

    fn apply_migrations(
        &mut self,
        templates: &FeatureTemplates,
        prefix: &str,
        outcome: &mut InstallOutcome,
    ) {
        let files = match templates.migration_files(&self.files) {
            Ok(files) => files,
            Err(e) => {
                outcome.record_error(format!("migration enumeration failed: {}", e));
                return;
            }
        };

        for template in files {
            let Some(name) = Self::migration_name(&template, prefix) else {
                outcome.record_error(format!(
                    "migration '{}' has no usable file name",
                    template.display()
                ));
                continue;
            };

            let content = match self.files.read_to_string(&template) {
                Ok(content) => content,
                Err(e) => {
                    outcome.record_error(format!("migration '{}': {}", template.display(), e));
                    continue;
                }
            };

            // Migrations are an append-only log: always a fresh artifact,
            // never a reused one.
            match self.scaffold.create_migration(&name) {
                Ok(artifact) => match self.files.write(&artifact, &content) {
                    Ok(()) => outcome.record_installed(artifact),
                    Err(e) => {
                        outcome.record_error(format!("migration '{}': {}", template.display(), e));
                    }
                },
                Err(e) => {
                    outcome.record_error(format!("migration '{}': {}", template.display(), e));
                }
            }
        }
    }

    fn apply_functions(
        &mut self,
        templates: &FeatureTemplates,
        prefix: &str,
        resolutions: &Resolutions,
        outcome: &mut InstallOutcome,
    ) {
        let dirs = match templates.function_dirs(&self.files) {
            Ok(dirs) => dirs,
            Err(e) => {
                outcome.record_error(format!("function enumeration failed: {}", e));
                return;
            }
        };

        for template_dir in dirs {
            let Some(name) = Self::prefixed_name(prefix, &template_dir) else {
                outcome.record_error(format!(
                    "function template '{}' has no usable name",
                    template_dir.display()
                ));
                continue;
            };
            let target = self.layout.functions_dir().join(&name);

            let exists = self.files.exists(&target);
            match function_action(exists, resolutions.get(&target).copied()) {
                FunctionAction::Skip => outcome.record_skipped(target),
                FunctionAction::ScaffoldThenCopy => {
                    if let Err(e) = self.scaffold.create_function(&name) {
                        outcome.record_error(format!("function '{}': {}", name, e));
                        continue;
                    }
                    self.copy_function_tree(&template_dir, &target, outcome);
                }
                FunctionAction::CopyOver => {
                    self.copy_function_tree(&template_dir, &target, outcome);
                }
            }
        }
    }

    fn copy_function_tree(
        &mut self,
        template_dir: &Path,
        target: &Path,
        outcome: &mut InstallOutcome,
    ) {
        let files = match self.files.walk_files(template_dir) {
            Ok(files) => files,
            Err(e) => {
                outcome.record_error(format!(
                    "function tree '{}' enumeration failed: {}",
                    template_dir.display(),
                    e
                ));
                return;
            }
        };

        for file in files {
            let relative = match file.strip_prefix(template_dir) {
                Ok(relative) => relative.to_path_buf(),
                Err(_) => {
                    outcome.record_error(format!(
                        "function file '{}' outside template '{}'",
                        file.display(),
                        template_dir.display()
                    ));
                    continue;
                }
            };
            let dest = target.join(relative);
            match self.files.copy(&file, &dest) {
                Ok(()) => outcome.record_installed(dest),
                Err(e) => {
                    outcome.record_error(format!("function file '{}': {}", file.display(), e));
                }
            }
        }
    }

    fn apply_seeds(
        &mut self,
        feature_id: &str,
        templates: &FeatureTemplates,
        outcome: &mut InstallOutcome,
    ) {
        let seeds = match templates.seed_files(&self.files) {
            Ok(seeds) => seeds,
            Err(e) => {
                outcome.record_error(format!("seed enumeration failed: {}", e));
                return;
            }
        };
        if seeds.is_empty() {
            return;
        }

        let seed_path = self.layout.seed_file().to_path_buf();
        let existing = if self.files.exists(&seed_path) {
            match self.files.read_to_string(&seed_path) {
                Ok(existing) => existing,
                Err(e) => {
                    outcome.record_error(format!("seed '{}': {}", seed_path.display(), e));
                    return;
                }
            }
        } else {
            String::new()
        };

        if seed::contains_block(&existing, feature_id) {
            log::debug!("seed block for '{}' already merged", feature_id);
            return;
        }

        let mut sources = Vec::new();
        for template in &seeds {
            match self.files.read_to_string(template) {
                Ok(content) => {
                    let name = template
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    sources.push((name, content));
                }
                Err(e) => {
                    outcome.record_error(format!("seed '{}': {}", template.display(), e));
                }
            }
        }
        if sources.is_empty() {
            return;
        }

        let block = seed::build_block(feature_id, &sources);
        let merged = seed::append_block(&existing, &block);
        match self.files.write(&seed_path, &merged) {
            Ok(()) => outcome.record_installed(seed_path),
            Err(e) => {
                outcome.record_error(format!("seed '{}': {}", seed_path.display(), e));
            }
        }
    }

    fn persist_record(&mut self, id: &str, version: &str, outcome: &mut InstallOutcome) {
        let files = outcome
            .installed_files
            .iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect();
        let record = InstalledRecord::new(version, files);
        if let Err(e) = self.config.persist(id, record) {
            outcome.record_error(format!(
                "failed to persist install record for '{}': {}",
                id, e
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use stackkit_config::{ConfigError, MemoryConfigStore};
    use stackkit_file_store::MemoryFileStore;
    use stackkit_scaffold::ScaffoldError;

    /// Recording scaffold double; numbers migrations so repeated calls
    /// stay sortable and collision-free.
    struct FakeScaffold {
        available: bool,
        fail_migrations: bool,
        migration_counter: u64,
        migrations: Vec<String>,
        functions: Vec<String>,
    }

    impl FakeScaffold {
        fn new() -> Self {
            Self {
                available: true,
                fail_migrations: false,
                migration_counter: 0,
                migrations: Vec::new(),
                functions: Vec::new(),
            }
        }
    }

    impl ScaffoldTool for FakeScaffold {
        fn is_available(&self) -> bool {
            self.available
        }

        fn create_migration(&mut self, name: &str) -> Result<PathBuf, ScaffoldError> {
            if self.fail_migrations {
                return Err(ScaffoldError::Unavailable {
                    message: "refused".to_string(),
                });
            }
            self.migration_counter += 1;
            self.migrations.push(name.to_string());
            Ok(PathBuf::from(format!(
                "migrations/{:014}_{}.sql",
                self.migration_counter, name
            )))
        }

        fn create_function(&mut self, name: &str) -> Result<(), ScaffoldError> {
            self.functions.push(name.to_string());
            Ok(())
        }
    }

    /// Config store whose persist always fails.
    struct BrokenConfigStore(MemoryConfigStore);

    impl ConfigStore for BrokenConfigStore {
        fn prefix(&self) -> Option<&str> {
            self.0.prefix()
        }

        fn source_dir(&self) -> &Path {
            self.0.source_dir()
        }

        fn installed(&self) -> &BTreeMap<String, InstalledRecord> {
            self.0.installed()
        }

        fn persist(&mut self, _id: &str, _record: InstalledRecord) -> Result<(), ConfigError> {
            Err(ConfigError::Io {
                path: PathBuf::from("stackkit.json"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn registry_json(features: &str) -> Registry {
        Registry::parse(&format!(
            r#"{{ "version": "1", "features": {{ {} }} }}"#,
            features
        ))
        .unwrap()
    }

    fn feature_json(deps: &[&str]) -> String {
        let deps = deps
            .iter()
            .map(|d| format!("\"{}\"", d))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            r#"{{ "name": "n", "description": "d", "version": "1.0.0",
                 "dependencies": [{}], "category": "general" }}"#,
            deps
        )
    }

    fn auth_registry() -> Registry {
        registry_json(&format!(r#""auth": {}"#, feature_json(&[])))
    }

    /// Store holding the full template tree of an `auth` feature.
    fn auth_store() -> MemoryFileStore {
        let mut store = MemoryFileStore::new();
        store
            .write(
                Path::new("stackkit/auth/schemas/users.sql"),
                "create table users;",
            )
            .unwrap();
        store
            .write(
                Path::new("stackkit/auth/migrations/init.sql"),
                "alter table users;",
            )
            .unwrap();
        store
            .write(
                Path::new("stackkit/auth/functions/login/index.ts"),
                "export {};",
            )
            .unwrap();
        store
            .write(
                Path::new("stackkit/auth/seed/roles.sql"),
                "insert into roles;",
            )
            .unwrap();
        store
    }

    fn installer(
        registry: &Registry,
        store: MemoryFileStore,
    ) -> Installer<'_, MemoryFileStore, MemoryConfigStore, FakeScaffold> {
        Installer::new(
            registry,
            store,
            MemoryConfigStore::new(),
            FakeScaffold::new(),
        )
    }

    #[test]
    fn unknown_feature_is_not_found() {
        let registry = auth_registry();
        let mut installer = installer(&registry, MemoryFileStore::new());
        let result = installer.install_feature("ghost", &Resolutions::new());
        assert!(matches!(result, Err(InstallerError::NotFound { .. })));
    }

    #[test]
    fn unavailable_tool_is_fatal_before_any_stage() {
        let registry = auth_registry();
        let store = auth_store();
        let files_before = store.file_count();

        let mut installer = Installer::new(
            &registry,
            store,
            MemoryConfigStore::new(),
            FakeScaffold {
                available: false,
                ..FakeScaffold::new()
            },
        );

        let result = installer.install_feature("auth", &Resolutions::new());
        assert!(matches!(result, Err(InstallerError::ToolUnavailable)));
        assert_eq!(installer.files().file_count(), files_before);
        assert!(!installer.config().is_installed("auth"));
    }

    #[test]
    fn full_install_touches_every_stage() {
        let registry = auth_registry();
        let mut installer = installer(&registry, auth_store());

        let outcome = installer
            .install_feature("auth", &Resolutions::new())
            .unwrap();

        assert!(outcome.success(), "errors: {:?}", outcome.errors);
        assert!(outcome
            .installed_files
            .contains(&PathBuf::from("schemas/users.sql")));
        assert!(outcome
            .installed_files
            .contains(&PathBuf::from("functions/login/index.ts")));
        assert!(outcome.installed_files.contains(&PathBuf::from("seed.sql")));
        assert!(installer.config().is_installed("auth"));
        assert_eq!(installer.scaffold().functions, vec!["login".to_string()]);
        assert_eq!(installer.scaffold().migrations.len(), 1);
    }

    #[test]
    fn prefix_applied_once_to_base_names() {
        let registry = auth_registry();
        let mut installer = Installer::new(
            &registry,
            auth_store(),
            MemoryConfigStore::new().with_prefix("acme_"),
            FakeScaffold::new(),
        );

        let outcome = installer
            .install_feature("auth", &Resolutions::new())
            .unwrap();

        assert!(outcome
            .installed_files
            .contains(&PathBuf::from("schemas/acme_users.sql")));
        assert!(outcome
            .installed_files
            .contains(&PathBuf::from("functions/acme_login/index.ts")));
        assert_eq!(
            installer.scaffold().migrations,
            vec!["acme_init".to_string()]
        );
        // The inner file name is untouched; only the directory was prefixed.
        assert!(installer
            .files()
            .exists(Path::new("functions/acme_login/index.ts")));
    }

    #[test]
    fn schema_skip_resolution_never_writes() {
        let registry = auth_registry();
        let mut store = auth_store();
        store
            .write(Path::new("schemas/users.sql"), "preexisting")
            .unwrap();

        let mut installer = installer(&registry, store);
        let mut resolutions = Resolutions::new();
        resolutions.insert(PathBuf::from("schemas/users.sql"), Resolution::Skip);

        let outcome = installer.install_feature("auth", &resolutions).unwrap();

        assert!(outcome
            .skipped_files
            .contains(&PathBuf::from("schemas/users.sql")));
        assert!(!outcome
            .installed_files
            .contains(&PathBuf::from("schemas/users.sql")));
        assert_eq!(
            installer
                .files()
                .read_to_string(Path::new("schemas/users.sql"))
                .unwrap(),
            "preexisting"
        );
    }

    #[test]
    fn schema_overwrite_resolution_writes() {
        let registry = auth_registry();
        let mut store = auth_store();
        store
            .write(Path::new("schemas/users.sql"), "preexisting")
            .unwrap();

        let mut installer = installer(&registry, store);
        let mut resolutions = Resolutions::new();
        resolutions.insert(PathBuf::from("schemas/users.sql"), Resolution::Overwrite);

        let outcome = installer.install_feature("auth", &resolutions).unwrap();

        assert!(outcome
            .installed_files
            .contains(&PathBuf::from("schemas/users.sql")));
        assert!(!outcome
            .skipped_files
            .contains(&PathBuf::from("schemas/users.sql")));
        assert_eq!(
            installer
                .files()
                .read_to_string(Path::new("schemas/users.sql"))
                .unwrap(),
            "create table users;"
        );
    }

    #[test]
    fn double_install_scaffolds_two_migrations_but_merges_seed_once() {
        let registry = auth_registry();
        let mut installer = installer(&registry, auth_store());

        installer
            .install_feature("auth", &Resolutions::new())
            .unwrap();
        installer
            .install_feature("auth", &Resolutions::new())
            .unwrap();

        assert_eq!(installer.scaffold().migrations.len(), 2);

        let seed = installer
            .files()
            .read_to_string(Path::new("seed.sql"))
            .unwrap();
        let begin_markers = seed
            .lines()
            .filter(|line| *line == "-- stackkit:begin auth")
            .count();
        assert_eq!(begin_markers, 1);
        let end_markers = seed
            .lines()
            .filter(|line| *line == "-- stackkit:end auth")
            .count();
        assert_eq!(end_markers, 1);
    }

    #[test]
    fn absent_function_has_no_conflict_and_scaffolds_exactly_once() {
        let registry = auth_registry();
        let mut installer = installer(&registry, auth_store());

        let conflicts = installer.analyze_conflicts("auth").unwrap();
        assert!(conflicts
            .iter()
            .all(|c| c.path != Path::new("functions/login")));

        installer
            .install_feature("auth", &Resolutions::new())
            .unwrap();

        assert_eq!(installer.scaffold().functions, vec!["login".to_string()]);
        assert_eq!(
            installer
                .files()
                .read_to_string(Path::new("functions/login/index.ts"))
                .unwrap(),
            "export {};"
        );
    }

    #[test]
    fn existing_function_with_skip_makes_no_scaffold_call_and_copies_nothing() {
        let registry = auth_registry();
        let mut store = auth_store();
        store
            .write(Path::new("functions/login/index.ts"), "custom")
            .unwrap();

        let mut installer = installer(&registry, store);
        let mut resolutions = Resolutions::new();
        resolutions.insert(PathBuf::from("functions/login"), Resolution::Skip);

        let outcome = installer.install_feature("auth", &resolutions).unwrap();

        assert!(outcome
            .skipped_files
            .contains(&PathBuf::from("functions/login")));
        assert!(installer.scaffold().functions.is_empty());
        assert_eq!(
            installer
                .files()
                .read_to_string(Path::new("functions/login/index.ts"))
                .unwrap(),
            "custom"
        );
    }

    #[test]
    fn existing_function_without_resolution_skips_silently() {
        let registry = auth_registry();
        let mut store = auth_store();
        store
            .write(Path::new("functions/login/index.ts"), "custom")
            .unwrap();

        let mut installer = installer(&registry, store);
        let outcome = installer
            .install_feature("auth", &Resolutions::new())
            .unwrap();

        assert!(outcome
            .skipped_files
            .contains(&PathBuf::from("functions/login")));
        assert!(outcome.success(), "silent skip must not be an error");
        assert_eq!(
            installer
                .files()
                .read_to_string(Path::new("functions/login/index.ts"))
                .unwrap(),
            "custom"
        );
    }

    #[test]
    fn existing_function_with_overwrite_copies_without_scaffolding() {
        let registry = auth_registry();
        let mut store = auth_store();
        store
            .write(Path::new("functions/login/index.ts"), "custom")
            .unwrap();

        let mut installer = installer(&registry, store);
        let mut resolutions = Resolutions::new();
        resolutions.insert(PathBuf::from("functions/login"), Resolution::Overwrite);

        let outcome = installer.install_feature("auth", &resolutions).unwrap();

        assert!(outcome
            .installed_files
            .contains(&PathBuf::from("functions/login/index.ts")));
        assert!(installer.scaffold().functions.is_empty());
        assert_eq!(
            installer
                .files()
                .read_to_string(Path::new("functions/login/index.ts"))
                .unwrap(),
            "export {};"
        );
    }

    #[test]
    fn analyze_conflicts_reports_only_existing_targets() {
        let registry = auth_registry();
        let mut store = auth_store();
        store
            .write(Path::new("schemas/users.sql"), "preexisting")
            .unwrap();

        let installer = installer(&registry, store);
        let conflicts = installer.analyze_conflicts("auth").unwrap();

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].path, Path::new("schemas/users.sql"));
        assert!(conflicts[0].exists_on_disk);
        assert!(conflicts[0].resolution.is_none());
    }

    #[test]
    fn stage_item_errors_collect_without_aborting_later_stages() {
        let registry = auth_registry();
        let mut installer = Installer::new(
            &registry,
            auth_store(),
            MemoryConfigStore::new(),
            FakeScaffold {
                fail_migrations: true,
                ..FakeScaffold::new()
            },
        );

        let outcome = installer
            .install_feature("auth", &Resolutions::new())
            .unwrap();

        assert!(!outcome.success());
        assert_eq!(outcome.errors.len(), 1);
        // Schema before and function/seed after the failing stage all ran.
        assert!(outcome
            .installed_files
            .contains(&PathBuf::from("schemas/users.sql")));
        assert!(outcome
            .installed_files
            .contains(&PathBuf::from("functions/login/index.ts")));
        assert!(outcome.installed_files.contains(&PathBuf::from("seed.sql")));
        // The record is persisted even for a partial failure.
        assert!(installer.config().is_installed("auth"));
    }

    #[test]
    fn persist_failure_flips_success() {
        let registry = auth_registry();
        let mut installer = Installer::new(
            &registry,
            auth_store(),
            BrokenConfigStore(MemoryConfigStore::new()),
            FakeScaffold::new(),
        );

        let outcome = installer
            .install_feature("auth", &Resolutions::new())
            .unwrap();

        assert!(!outcome.success());
        assert!(outcome.errors.iter().any(|e| e.contains("persist")));
        // Artifacts still landed.
        assert!(installer.files().exists(Path::new("schemas/users.sql")));
    }

    #[test]
    fn reinstall_replaces_the_record_wholesale() {
        let registry = auth_registry();
        let mut installer = installer(&registry, auth_store());

        installer
            .install_feature("auth", &Resolutions::new())
            .unwrap();
        let first = installer.config().record("auth").unwrap().clone();

        let outcome = installer
            .install_feature("auth", &Resolutions::new())
            .unwrap();
        let second = installer.config().record("auth").unwrap().clone();

        // Second install skips nothing new but scaffolds a fresh migration,
        // so the file lists differ; the record reflects only the last run.
        assert_ne!(first.files, second.files);
        let expected: Vec<String> = outcome
            .installed_files
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        assert_eq!(second.files, expected);
    }

    #[test]
    fn check_dependencies_reports_missing() {
        let registry = registry_json(&format!(
            r#""edge-fn-utils": {}, "consumer": {}"#,
            feature_json(&[]),
            feature_json(&["edge-fn-utils"])
        ));
        let installer = installer(&registry, MemoryFileStore::new());

        let check = installer.check_dependencies("consumer").unwrap();
        assert!(!check.satisfied);
        assert_eq!(check.missing, vec!["edge-fn-utils".to_string()]);
    }

    #[test]
    fn check_dependencies_satisfied_when_installed() {
        let registry = registry_json(&format!(
            r#""edge-fn-utils": {}, "consumer": {}"#,
            feature_json(&[]),
            feature_json(&["edge-fn-utils"])
        ));
        let mut config = MemoryConfigStore::new();
        config
            .persist("edge-fn-utils", InstalledRecord::new("1.0.0", vec![]))
            .unwrap();

        let installer =
            Installer::new(&registry, MemoryFileStore::new(), config, FakeScaffold::new());

        let check = installer.check_dependencies("consumer").unwrap();
        assert!(check.satisfied);
        assert!(check.missing.is_empty());
    }

    fn chain_registry() -> Registry {
        registry_json(&format!(
            r#""a": {}, "b": {}, "c": {}"#,
            feature_json(&[]),
            feature_json(&["a"]),
            feature_json(&["b"])
        ))
    }

    fn chain_store() -> MemoryFileStore {
        let mut store = MemoryFileStore::new();
        for id in ["a", "b", "c"] {
            store
                .write(
                    &PathBuf::from(format!("stackkit/{}/schemas/{}.sql", id, id)),
                    "create table;",
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn missing_dependencies_install_in_closure_order() {
        let registry = chain_registry();
        let mut installer = installer(&registry, chain_store());

        let results = installer
            .install_with_dependencies("c", &Resolutions::new())
            .unwrap();

        let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        for id in ["a", "b", "c"] {
            assert!(installer.config().is_installed(id));
        }
    }

    #[test]
    fn installed_dependencies_are_not_reinstalled() {
        let registry = chain_registry();
        let mut config = MemoryConfigStore::new();
        config
            .persist("a", InstalledRecord::new("1.0.0", vec![]))
            .unwrap();

        let mut installer =
            Installer::new(&registry, chain_store(), config, FakeScaffold::new());

        let results = installer
            .install_with_dependencies("c", &Resolutions::new())
            .unwrap();

        let ids: Vec<&str> = results.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn dependency_conflicts_are_forced_to_overwrite() {
        let registry = chain_registry();
        let mut store = chain_store();
        store.write(Path::new("schemas/a.sql"), "stale").unwrap();

        let mut installer = installer(&registry, store);
        installer
            .install_with_dependencies("c", &Resolutions::new())
            .unwrap();

        assert_eq!(
            installer
                .files()
                .read_to_string(Path::new("schemas/a.sql"))
                .unwrap(),
            "create table;"
        );
    }

    #[test]
    fn template_predicates() {
        let registry = auth_registry();
        let installer = installer(&registry, auth_store());

        assert!(installer.has_schemas("auth"));
        assert!(installer.has_migrations("auth"));
        assert!(installer.has_functions("auth"));
        assert!(installer.has_seeds("auth"));
        assert!(!installer.has_schemas("ghost"));
    }
}
