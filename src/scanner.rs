//! Directory scanning for annotated tool files.

use std::{
    collections::{BTreeMap, BTreeSet},
    io,
    path::{Path, PathBuf},
};

use tracing::debug;
use walkdir::WalkDir;

use crate::{
    diagnostics::Diagnostics,
    paths::display_path,
    tool::{Registry, Tool},
};

/// Directory names whose subtrees are never scanned.
const SKIPPED_DIRS: [&str; 15] = [
    ".venv",
    "venv",
    ".env",
    "env",
    "node_modules",
    "__pycache__",
    ".git",
    ".tox",
    ".nox",
    ".mypy_cache",
    ".pytest_cache",
    "dist",
    "build",
    ".eggs",
    "site-packages",
];

/// Suffix of packaging metadata directories that are never scanned.
const EGG_INFO_SUFFIX: &str = ".egg-info";

/// A tool read from one file.
#[derive(Debug, Clone)]
pub struct ScannedTool {
    /// The parsed descriptor, with `file` and `language` set.
    pub tool: Tool,
    /// False when the documentation block was never closed.
    pub terminated: bool,
}

/// Extracts tool metadata from source files of one language.
pub trait Scanner {
    /// Language tag recorded on scanned tools.
    fn language(&self) -> &'static str;

    /// File extensions handled, including the leading dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Return true if this scanner handles the file at `path`.
    fn can_scan(&self, path: &Path) -> bool {
        let Some(extension) = path.extension().and_then(|extension| extension.to_str()) else {
            return false;
        };
        self.extensions()
            .iter()
            .any(|candidate| candidate.strip_prefix('.') == Some(extension))
    }

    /// Read one file. `Ok(None)` means the file is not a tool.
    fn scan(&self, path: &Path) -> io::Result<Option<ScannedTool>>;
}

/// Tool name defined by more than one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTool {
    /// Tool name.
    pub name: String,
    /// Every defining file, in scan order; the last one is registered.
    pub files: Vec<PathBuf>,
}

/// Artifact provided by more than one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousArtifact {
    /// Artifact name.
    pub artifact: String,
    /// Providing tools in lookup order; the first one wins.
    pub tools: Vec<String>,
}

/// Result of scanning a set of roots.
#[derive(Debug, Default)]
pub struct Scan {
    /// Registered tools.
    pub registry: Registry,
    /// Names defined in more than one file.
    pub duplicates: Vec<DuplicateTool>,
    /// Artifacts with more than one provider.
    pub ambiguous: Vec<AmbiguousArtifact>,
    /// Tool files whose documentation block was unterminated.
    pub unterminated: Vec<PathBuf>,
}

impl Scan {
    /// Number of findings that deserve the user's attention.
    pub fn finding_count(&self) -> usize {
        self.duplicates.len() + self.ambiguous.len() + self.unterminated.len()
    }

    /// Emit every finding as a warning.
    pub(crate) fn report(&self, diagnostics: &mut Diagnostics) {
        for duplicate in &self.duplicates {
            let Some(winner) = duplicate.files.last() else {
                continue;
            };
            diagnostics.warn(format!(
                "tool '{}' is defined in {} files, using {}",
                duplicate.name,
                duplicate.files.len(),
                display_path(winner)
            ));
            for file in &duplicate.files {
                diagnostics.note(format!("  - {}", display_path(file)));
            }
        }
        for ambiguous in &self.ambiguous {
            diagnostics.warn(format!(
                "data '{}' is provided by {}; `get` uses {}",
                ambiguous.artifact,
                ambiguous.tools.join(", "),
                ambiguous.tools[0]
            ));
        }
        for file in &self.unterminated {
            diagnostics.warn(format!(
                "{}: documentation block is not closed",
                display_path(file)
            ));
        }
    }
}

/// Return true for directories whose subtrees are pruned.
pub fn is_skipped_dir(name: &str) -> bool {
    SKIPPED_DIRS.contains(&name) || name.ends_with(EGG_INFO_SUFFIX)
}

/// Return true for private files (leading `_` or `.`).
pub fn is_private_file(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

/// Walk `roots` and build a registry from every file a scanner accepts.
///
/// Missing roots are skipped. Unreadable entries and files that fail to
/// scan are left out without aborting the walk.
pub fn scan_directories(roots: &[PathBuf], scanners: &[Box<dyn Scanner>]) -> Scan {
    let mut scan = Scan::default();
    let mut definitions: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

    for root in roots {
        if !root.exists() {
            debug!(root = %root.display(), "skipping missing source");
            continue;
        }

        for path in candidate_files(root) {
            let Some(scanner) = scanners.iter().find(|scanner| scanner.can_scan(&path)) else {
                continue;
            };
            let scanned = match scanner.scan(&path) {
                Ok(Some(scanned)) => {
                    debug!(
                        path = %path.display(),
                        tool = %scanned.tool.name,
                        language = scanner.language(),
                        "found tool"
                    );
                    scanned
                }
                Ok(None) => {
                    debug!(path = %path.display(), "not a tool");
                    continue;
                }
                Err(error) => {
                    debug!(path = %path.display(), %error, "failed to scan file");
                    continue;
                }
            };

            if !scanned.terminated {
                scan.unterminated.push(path.clone());
            }
            definitions
                .entry(scanned.tool.name.clone())
                .or_default()
                .push(path);
            scan.registry.insert(scanned.tool);
        }
    }

    scan.duplicates = definitions
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(name, files)| DuplicateTool { name, files })
        .collect();
    scan.ambiguous = ambiguous_artifacts(&scan.registry);
    scan
}

/// Yield non-private files under `root`, pruning skipped directories.
pub(crate) fn candidate_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !is_skipped_dir(&entry.file_name().to_string_lossy())
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                debug!(%error, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| !is_private_file(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.into_path())
}

/// Collect artifacts that more than one tool provides.
fn ambiguous_artifacts(registry: &Registry) -> Vec<AmbiguousArtifact> {
    let artifacts: BTreeSet<&str> = registry
        .all()
        .flat_map(|tool| tool.provides.iter().map(String::as_str))
        .collect();
    artifacts
        .into_iter()
        .filter_map(|artifact| {
            let providers = registry.providers(artifact);
            (providers.len() > 1).then(|| AmbiguousArtifact {
                artifact: artifact.to_string(),
                tools: providers.into_iter().map(|tool| tool.name.clone()).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{is_private_file, is_skipped_dir};
    use crate::testutil::{TestFixture, tool_source};

    #[test]
    fn classifies_skipped_directories() {
        for name in [".git", "node_modules", "__pycache__", "venv", "foo.egg-info"] {
            assert!(is_skipped_dir(name), "{name} should be skipped");
        }
        assert!(!is_skipped_dir("tools"));
        assert!(!is_skipped_dir("egg-info-notes"));
        assert!(is_private_file("_helpers.py"));
        assert!(is_private_file(".hidden.py"));
        assert!(!is_private_file("fetch.py"));
    }

    #[test]
    fn prunes_excluded_directories() {
        let fixture = TestFixture::new()
            .with_file("tools/fetch.py", &tool_source("fetch", &["@provides prices"]))
            .with_file(".git/hooks/hook.py", &tool_source("git-hook", &[]))
            .with_file("node_modules/pkg/bin.py", &tool_source("node-bin", &[]))
            .with_file("pkg.egg-info/meta.py", &tool_source("egg", &[]))
            .with_file("tools/nested/build/out.py", &tool_source("built", &[]));

        let scan = fixture.scan();
        let names: Vec<_> = scan.registry.all().map(|tool| tool.name.as_str()).collect();
        assert_eq!(names, vec!["fetch"]);
    }

    #[test]
    fn skips_private_and_foreign_files() {
        let fixture = TestFixture::new()
            .with_file("tools/_private.py", &tool_source("private", &[]))
            .with_file("tools/.hidden.py", &tool_source("hidden", &[]))
            .with_file("tools/readme.md", &tool_source("markdown", &[]))
            .with_file("tools/plain.py", "print('no docstring')\n")
            .with_file("tools/real.py", &tool_source("real", &[]));

        let scan = fixture.scan();
        assert_eq!(scan.registry.len(), 1);
        let tool = scan.registry.get("real").expect("real");
        assert_eq!(tool.language, "python");
        assert!(tool.file.ends_with("tools/real.py"));
    }

    #[test]
    fn missing_roots_are_ignored() {
        let fixture = TestFixture::new().with_file("tools/a.py", &tool_source("a", &[]));
        let scan = fixture.scan_roots(&[fixture.path("nowhere"), fixture.path("tools")]);
        assert_eq!(scan.registry.len(), 1);
    }

    #[test]
    fn reports_duplicates_and_ambiguous_providers() {
        let fixture = TestFixture::new()
            .with_file("one/fetch.py", &tool_source("fetch", &["@provides prices"]))
            .with_file("two/fetch.py", &tool_source("fetch", &["@provides quotes"]))
            .with_file("two/other.py", &tool_source("alt-quotes", &["@provides quotes"]));

        let scan = fixture.scan_roots(&[fixture.path("one"), fixture.path("two")]);
        assert_eq!(scan.registry.len(), 2);
        let fetch = scan.registry.get("fetch").expect("fetch");
        assert_eq!(fetch.provides, vec!["quotes"]);

        assert_eq!(scan.duplicates.len(), 1);
        assert_eq!(scan.duplicates[0].files.len(), 2);
        assert_eq!(scan.ambiguous.len(), 1);
        assert_eq!(scan.ambiguous[0].artifact, "quotes");
        assert_eq!(scan.ambiguous[0].tools, vec!["alt-quotes", "fetch"]);
        assert_eq!(scan.finding_count(), 2);
    }

    #[test]
    fn records_unterminated_blocks() {
        let fixture = TestFixture::new().with_file("tools/open.py", "\"\"\"\n@tool open\n");
        let scan = fixture.scan();
        assert!(scan.registry.get("open").is_some());
        assert_eq!(scan.unterminated.len(), 1);
    }
}
