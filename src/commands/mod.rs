//! CLI command implementations.

use std::io::{self, IsTerminal};

/// Output color handling selection.
#[derive(Debug, Clone, Copy)]
pub enum ColorChoice {
    /// Colorize only when output is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

impl ColorChoice {
    /// Determine whether color output should be enabled.
    pub(crate) fn enabled(self) -> bool {
        match self {
            Self::Auto => io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Print the hint shown when nothing is registered.
pub(crate) fn print_no_sources() {
    println!("No sources registered.");
    println!("Register a directory with: tctl add <path>");
}

// Command modules are ordered alphabetically - maintain this order.
/// Add command implementation.
pub mod add;
/// Find command implementation.
pub mod find;
/// Get command implementation.
pub mod get;
/// Lint command implementation.
pub mod lint;
/// List command implementation.
pub mod list;
/// New command implementation.
pub mod new;
/// Remove command implementation.
pub mod remove;
/// Run command implementation.
pub mod run;
/// Show command implementation.
pub mod show;
/// Sources command implementation.
pub mod sources;
/// Status command implementation.
pub mod status;
/// Where command implementation.
pub mod suggest;
/// Sync command implementation.
pub mod sync;
/// What command implementation.
pub mod what;
