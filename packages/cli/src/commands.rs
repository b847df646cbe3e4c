//! Command implementations: list, info, check, install.

use std::path::Path;

use nu_ansi_term::Color;

use stackkit_config::ConfigStore;
use stackkit_installer::{
    resolve_all, to_resolutions, ConflictCandidate, InstallOutcome, Installer, Resolution,
    Resolutions,
};

use crate::project::{self, CliError, ProjectParts};

/// Non-interactive stand-in for the conflict-resolution protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Resolve every conflict as overwrite.
    OverwriteAll,
    /// Resolve every conflict as skip.
    SkipAll,
    /// Leave conflicts unresolved; the protocol treats them as skip.
    SkipUnresolved,
}

/// Apply a policy to analyzed conflicts, yielding the resolution map the
/// installer consumes.
pub fn conflict_resolutions(
    candidates: &[ConflictCandidate],
    policy: ConflictPolicy,
) -> Resolutions {
    match policy {
        ConflictPolicy::OverwriteAll => resolve_all(candidates, Resolution::Overwrite),
        ConflictPolicy::SkipAll => resolve_all(candidates, Resolution::Skip),
        ConflictPolicy::SkipUnresolved => to_resolutions(candidates),
    }
}

/// List features, grouped by category.
pub fn list(root: &Path, category: Option<&str>) -> Result<bool, CliError> {
    let parts = project::open(root)?;

    let categories: Vec<String> = match category {
        Some(c) => vec![c.to_string()],
        None => parts.registry.categories(),
    };

    for category in &categories {
        println!("{}", Color::Cyan.bold().paint(category.as_str()));
        for feature in parts.registry.features_by_category(category) {
            let marker = if parts.config.is_installed(&feature.id) {
                Color::Green.paint(" [installed]").to_string()
            } else {
                String::new()
            };
            println!(
                "  {} {}{}",
                Color::Default.bold().paint(&feature.id),
                Color::DarkGray.paint(&feature.description),
                marker
            );
        }
    }
    Ok(true)
}

/// Show one feature in detail.
pub fn info(root: &Path, id: &str) -> Result<bool, CliError> {
    let parts = project::open(root)?;
    let ProjectParts {
        registry,
        files,
        config,
        scaffold,
    } = parts;

    let Some(feature) = registry.get_feature(id) else {
        println!("{}", Color::Red.paint(format!("unknown feature '{}'", id)));
        return Ok(false);
    };

    println!("{} ({})", Color::Default.bold().paint(&feature.name), id);
    println!("  {}", feature.description);
    println!("  version:  {}", feature.version);
    println!("  category: {}", feature.category);

    let closure = registry.resolve_dependencies(id)?;
    if closure.len() > 1 {
        println!("  requires: {}", closure[..closure.len() - 1].join(", "));
    }

    if let Some(record) = config.record(id) {
        println!(
            "  {} v{} at {}",
            Color::Green.paint("installed"),
            record.version,
            record.installed_at
        );
    }

    let installer = Installer::new(&registry, files, config, scaffold);
    let mut kinds = Vec::new();
    if installer.has_schemas(id) {
        kinds.push("schemas");
    }
    if installer.has_migrations(id) {
        kinds.push("migrations");
    }
    if installer.has_functions(id) {
        kinds.push("functions");
    }
    if installer.has_seeds(id) {
        kinds.push("seeds");
    }
    println!("  provides: {}", kinds.join(", "));

    Ok(true)
}

/// Report dependency satisfaction for a feature.
pub fn check(root: &Path, id: &str) -> Result<bool, CliError> {
    let parts = project::open(root)?;
    let installer = Installer::new(&parts.registry, parts.files, parts.config, parts.scaffold);

    let check = installer.check_dependencies(id)?;
    if check.satisfied {
        println!("{}", Color::Green.paint("all dependencies installed"));
    } else {
        println!(
            "{} {}",
            Color::Yellow.paint("missing:"),
            check.missing.join(", ")
        );
    }
    Ok(check.satisfied)
}

/// Install a feature and its missing dependencies under a conflict policy.
pub fn install(root: &Path, id: &str, policy: ConflictPolicy) -> Result<bool, CliError> {
    let parts = project::open(root)?;
    let mut installer =
        Installer::new(&parts.registry, parts.files, parts.config, parts.scaffold);

    let conflicts = installer.analyze_conflicts(id)?;
    for conflict in &conflicts {
        let action = match policy {
            ConflictPolicy::OverwriteAll => Color::Yellow.paint("overwrite"),
            _ => Color::DarkGray.paint("skip"),
        };
        println!("  {} {}", action, conflict.path.display());
    }
    let resolutions = conflict_resolutions(&conflicts, policy);

    let results = installer.install_with_dependencies(id, &resolutions)?;

    let mut all_ok = true;
    for (feature_id, outcome) in &results {
        print_outcome(feature_id, outcome);
        all_ok &= outcome.success();
    }
    Ok(all_ok)
}

fn print_outcome(feature_id: &str, outcome: &InstallOutcome) {
    let status = if outcome.success() {
        Color::Green.paint("installed")
    } else {
        Color::Red.paint("failed")
    };
    println!(
        "{} {} ({} files, {} skipped)",
        status,
        Color::Default.bold().paint(feature_id),
        outcome.installed_files.len(),
        outcome.skipped_files.len()
    );
    for error in &outcome.errors {
        println!("    {} {}", Color::Red.paint("error:"), error);
    }
}
