//! Tool descriptors and the in-memory registry built by a scan.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use path_clean::PathClean;
use serde::Serialize;

/// Freshness policy used when a tool does not declare one.
pub const DEFAULT_FRESHNESS: &str = "manual";

/// A discoverable unit of work extracted from a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tool {
    /// Unique tool name from `@tool`.
    pub name: String,
    /// Free-text version from `@version`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Source file the tool was scanned from.
    pub file: PathBuf,
    /// Language tag of the scanner that produced the tool.
    pub language: String,
    /// One-line human summary.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Artifact names this tool produces.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<String>,
    /// Artifact names that must be fresh before this tool runs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
    /// Output path, relative to the parent of the tool's directory unless absolute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Freshness policy name.
    pub freshness: String,
    /// Capability statements.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<String>,
    /// Explicit exclusions, used for negative search.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub boundaries: Vec<String>,
    /// Search keywords.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Command-line arguments keyed by flag name (including the leading `--`).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub interface: BTreeMap<String, Arg>,
    /// Example invocations.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// A command-line argument declared in a tool's `@interface` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arg {
    /// Flag name, including the leading `--`.
    pub name: String,
    /// Declared type token; advisory only.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the argument must be supplied.
    pub required: bool,
    /// Default value, if declared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Free-text description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Default for Tool {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: None,
            file: PathBuf::new(),
            language: String::new(),
            description: String::new(),
            provides: Vec::new(),
            requires: Vec::new(),
            output: None,
            freshness: DEFAULT_FRESHNESS.to_string(),
            capabilities: Vec::new(),
            boundaries: Vec::new(),
            keywords: Vec::new(),
            interface: BTreeMap::new(),
            examples: Vec::new(),
        }
    }
}

impl Tool {
    /// Return true if this tool lists `artifact` in its provides.
    pub fn provides(&self, artifact: &str) -> bool {
        self.provides.iter().any(|provided| provided == artifact)
    }

    /// Resolve the declared output to a filesystem path.
    ///
    /// Relative outputs are anchored one level above the directory holding
    /// the tool file, so `tools/fetch.py` with `@output data/x.csv` writes
    /// to `data/x.csv` next to `tools/`.
    pub fn output_path(&self) -> Option<PathBuf> {
        let output = self.output.as_deref()?;
        let declared = Path::new(output);
        if declared.is_absolute() {
            return Some(declared.to_path_buf());
        }
        let dir = self.file.parent().unwrap_or(Path::new("."));
        Some(dir.join("..").join(declared).clean())
    }

    /// Directory containing the tool file.
    pub fn dir(&self) -> &Path {
        self.file.parent().unwrap_or(Path::new("."))
    }
}

/// Index of tools discovered by one scan, keyed by tool name.
///
/// Iteration is in ascending name order, which also fixes the
/// first-match order of [`Registry::find_by_provides`].
#[derive(Debug, Default, Clone)]
pub struct Registry {
    /// Tools keyed by name.
    tools: BTreeMap<String, Tool>,
}

impl Registry {
    /// Insert a tool, replacing any tool with the same name.
    ///
    /// Tools with an empty name are not tools and are ignored. Returns the
    /// replaced tool, if any.
    pub fn insert(&mut self, tool: Tool) -> Option<Tool> {
        if tool.name.is_empty() {
            return None;
        }
        self.tools.insert(tool.name.clone(), tool)
    }

    /// Look up a tool by exact name.
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Find the first tool that provides `artifact`.
    pub fn find_by_provides(&self, artifact: &str) -> Option<&Tool> {
        self.tools.values().find(|tool| tool.provides(artifact))
    }

    /// Return every tool that provides `artifact`.
    pub fn providers(&self, artifact: &str) -> Vec<&Tool> {
        self.tools
            .values()
            .filter(|tool| tool.provides(artifact))
            .collect()
    }

    /// Iterate over all tools.
    pub fn all(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }

    /// Number of tools in the registry.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Return true when no tools were found.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
