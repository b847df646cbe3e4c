use std::path::PathBuf;

use clap::{Parser, Subcommand};

use stackkit_cli::commands::{self, ConflictPolicy};

/// stackkit - install feature bundles into a project
#[derive(Parser, Debug)]
#[command(name = "stackkit")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Project root directory
    #[arg(long, default_value = ".")]
    project: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available features, grouped by category
    List {
        /// Only show features in this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show a feature's descriptor, dependencies, and installed state
    Info { id: String },
    /// Report whether a feature's dependencies are satisfied
    Check { id: String },
    /// Install a feature and its missing dependencies
    Install {
        id: String,
        /// Overwrite every conflicting target path
        #[arg(long, conflicts_with = "skip_all")]
        overwrite_all: bool,
        /// Skip every conflicting target path
        #[arg(long, conflicts_with = "overwrite_all")]
        skip_all: bool,
    },
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let result = match args.command {
        Command::List { category } => commands::list(&args.project, category.as_deref()),
        Command::Info { id } => commands::info(&args.project, &id),
        Command::Check { id } => commands::check(&args.project, &id),
        Command::Install {
            id,
            overwrite_all,
            skip_all,
        } => {
            let policy = if overwrite_all {
                ConflictPolicy::OverwriteAll
            } else if skip_all {
                ConflictPolicy::SkipAll
            } else {
                ConflictPolicy::SkipUnresolved
            };
            commands::install(&args.project, &id, policy)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
