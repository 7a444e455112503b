#![warn(missing_docs)]
//! Library support for the tctl CLI.

/// Configuration plus scanned tools, shared by commands.
mod catalog;
/// Command-line interface wiring and dispatch.
mod cli;
/// Command implementations.
mod commands;
/// Configuration loading and persistence.
mod config;
/// Common diagnostics and warning aggregation.
mod diagnostics;
/// Leading documentation block extraction.
mod docblock;
/// Error handling for the crate.
mod error;
/// Output freshness policies.
mod freshness;
/// Registry of language handlers.
mod language;
/// Compatibility checks for tool files.
mod lint;
/// Color palette and styling for CLI output.
mod palette;
/// Path expansion and normalization utilities.
mod paths;
/// Python scanner and runner.
mod python;
/// Dependency resolution for `get`.
mod resolver;
/// Tool execution.
mod runner;
/// Directory scanning for annotated tools.
mod scanner;
/// Keyword search over tool metadata.
mod search;
/// Tag block parsing and rendering.
mod tags;
/// Shared fixtures for unit tests.
#[cfg(test)]
mod testutil;
/// Tool descriptors and the tool registry.
mod tool;

pub use crate::error::{Error, Result};

/// Run the CLI, returning a structured error on failure.
pub async fn run() -> Result<()> {
    cli::run().await
}
