//! Native scaffold implementation against a project directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{ScaffoldError, ScaffoldTool};

const MIGRATIONS_DIR: &str = "migrations";
const FUNCTIONS_DIR: &str = "functions";

const FUNCTION_BOILERPLATE: &str = r#"export async function handler(_req: Request): Promise<Response> {
  return new Response("ok");
}
"#;

/// A [`ScaffoldTool`] that creates artifacts directly under a project root.
///
/// Migration identifiers are UTC second timestamps (`YYYYMMDDHHMMSS`),
/// bumped past both the previous identifier issued by this instance and any
/// artifact already on disk, so repeated calls within one second still sort
/// strictly after one another.
pub struct LocalScaffold {
    root: PathBuf,
    last_stamp: u64,
}

impl LocalScaffold {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            last_stamp: 0,
        }
    }

    fn next_stamp(&mut self, name: &str) -> u64 {
        let now: u64 = Utc::now()
            .format("%Y%m%d%H%M%S")
            .to_string()
            .parse()
            .unwrap_or(self.last_stamp + 1);

        let mut stamp = now.max(self.last_stamp + 1);
        while self
            .root
            .join(MIGRATIONS_DIR)
            .join(Self::migration_file_name(stamp, name))
            .exists()
        {
            stamp += 1;
        }
        self.last_stamp = stamp;
        stamp
    }

    fn migration_file_name(stamp: u64, name: &str) -> String {
        format!("{}_{}.sql", stamp, name)
    }
}

impl ScaffoldTool for LocalScaffold {
    fn is_available(&self) -> bool {
        self.root.is_dir()
    }

    fn create_migration(&mut self, name: &str) -> Result<PathBuf, ScaffoldError> {
        let stamp = self.next_stamp(name);
        let relative = Path::new(MIGRATIONS_DIR).join(Self::migration_file_name(stamp, name));
        let full = self.root.join(&relative);

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|source| ScaffoldError::Io {
                path: relative.clone(),
                source,
            })?;
        }
        log::debug!("scaffolding migration {}", relative.display());
        fs::write(&full, "").map_err(|source| ScaffoldError::Io {
            path: relative.clone(),
            source,
        })?;

        Ok(relative)
    }

    fn create_function(&mut self, name: &str) -> Result<(), ScaffoldError> {
        let relative = Path::new(FUNCTIONS_DIR).join(name);
        let full = self.root.join(&relative);

        fs::create_dir_all(&full).map_err(|source| ScaffoldError::Io {
            path: relative.clone(),
            source,
        })?;

        let index = full.join("index.ts");
        if !index.exists() {
            log::debug!("scaffolding function {}", relative.display());
            fs::write(&index, FUNCTION_BOILERPLATE).map_err(|source| ScaffoldError::Io {
                path: relative.join("index.ts"),
                source,
            })?;
        }

        Ok(())
    }
}
