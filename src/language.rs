//! Registry of language handlers, built once in the composition root.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    config::Settings,
    error::{Error, Result},
    python::{PythonRunner, PythonScanner},
    runner::{Executor, Runner, run_inherited},
    scanner::{Scan, Scanner, scan_directories},
    tool::Tool,
};

/// Ordered scanners and runners; lookups take the first handler that accepts.
#[derive(Default)]
pub struct Languages {
    /// Scanners in priority order.
    scanners: Vec<Box<dyn Scanner>>,
    /// Runners in priority order.
    runners: Vec<Box<dyn Runner>>,
}

impl Languages {
    /// Create a registry with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the registry of built-in languages.
    pub fn builtin(settings: &Settings) -> Self {
        Self::new()
            .with_scanner(PythonScanner)
            .with_runner(PythonRunner::new(settings.python.clone()))
    }

    /// Append a scanner.
    pub fn with_scanner(mut self, scanner: impl Scanner + 'static) -> Self {
        self.scanners.push(Box::new(scanner));
        self
    }

    /// Append a runner.
    pub fn with_runner(mut self, runner: impl Runner + 'static) -> Self {
        self.runners.push(Box::new(runner));
        self
    }

    /// Find the scanner for a file.
    pub fn scanner_for(&self, path: &Path) -> Option<&dyn Scanner> {
        self.scanners
            .iter()
            .find(|scanner| scanner.can_scan(path))
            .map(Box::as_ref)
    }

    /// Find the runner for a tool.
    pub fn runner_for(&self, tool: &Tool) -> Option<&dyn Runner> {
        self.runners
            .iter()
            .find(|runner| runner.can_run(tool))
            .map(Box::as_ref)
    }

    /// Scan a set of source roots into one registry.
    pub fn scan_directories(&self, roots: &[PathBuf]) -> Scan {
        scan_directories(roots, &self.scanners)
    }

    /// Scan a single source root.
    pub fn scan_directory(&self, root: &Path) -> Scan {
        self.scan_directories(&[root.to_path_buf()])
    }
}

impl Executor for Languages {
    fn execute(&mut self, tool: &Tool, args: &[String]) -> Result<i32> {
        let runner = self
            .runner_for(tool)
            .ok_or_else(|| Error::UnsupportedLanguage {
                language: tool.language.clone(),
            })?;
        debug!(tool = %tool.name, language = runner.language(), "selected runner");
        let invocation = runner.invocation(tool, args)?;
        run_inherited(tool, &invocation)
    }
}
