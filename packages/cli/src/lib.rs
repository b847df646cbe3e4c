//! # stackkit-cli
//!
//! Command-line interface over the stackkit installer.
//!
//! ## Usage
//!
//! ```bash
//! # See what is available
//! stackkit list
//! stackkit info auth
//!
//! # Check and install
//! stackkit check auth
//! stackkit install auth
//!
//! # Non-interactive conflict policies
//! stackkit install auth --overwrite-all
//! stackkit install auth --skip-all
//! ```

pub mod commands;
pub mod project;

pub use project::CliError;
