//! Test utilities for setting up tool source trees.
//!
//! This module provides a `TestFixture` builder for creating isolated
//! source directories populated with annotated tool files.

#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::{config::Settings, language::Languages, scanner::Scan};

/// Python tool source with a terminated docstring and the given tag lines.
pub fn tool_source(name: &str, tags: &[&str]) -> String {
    let mut source = format!("#!/usr/bin/env python3\n\"\"\"\n{name}.py\nDescription for {name}.\n\n@tool {name}\n");
    for tag in tags {
        source.push_str(tag);
        source.push('\n');
    }
    source.push_str("\"\"\"\n\nimport sys\n");
    source
}

/// Test fixture for an isolated source tree.
pub struct TestFixture {
    /// Root temp directory (holds everything).
    root: TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty root.
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("create temp dir"),
        }
    }

    /// Write a file relative to the fixture root.
    pub fn with_file(self, relative: &str, contents: &str) -> Self {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write fixture file");
        self
    }

    /// Absolute path of a fixture-relative path.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Root directory of the fixture.
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Scan the whole fixture with the built-in languages.
    pub fn scan(&self) -> Scan {
        self.scan_roots(&[self.root.path().to_path_buf()])
    }

    /// Scan specific roots with the built-in languages.
    pub fn scan_roots(&self, roots: &[PathBuf]) -> Scan {
        Languages::builtin(&Settings::default()).scan_directories(roots)
    }
}
