//! Compatibility checks for tool files.
//!
//! Linting reports what a file needs before the scanner will pick it up as
//! a useful tool. Findings carry a stable code so reports can be grepped.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    docblock::extract_docblock,
    freshness::Policy,
    language::Languages,
    paths::normalize_path,
    scanner::candidate_files,
    tags::parse_tags,
};

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// The file will not work as a tool.
    Error,
    /// The tool works but lacks metadata other commands depend on.
    Warning,
    /// Optional improvement.
    Info,
}

/// A single lint finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Severity.
    pub level: Level,
    /// Absolute path of the file.
    pub file: PathBuf,
    /// Stable finding code such as `T002`.
    pub code: &'static str,
    /// Guidance for fixing the finding.
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.file.display(), self.message)
    }
}

/// All findings for one lint run, in discovery order.
#[derive(Debug, Default)]
pub struct Report {
    /// Findings from every file.
    findings: Vec<Finding>,
    /// Number of files examined.
    files: usize,
}

impl Report {
    /// Record a finding.
    fn add(&mut self, level: Level, file: &Path, code: &'static str, message: impl Into<String>) {
        self.findings.push(Finding {
            level,
            file: file.to_path_buf(),
            code,
            message: message.into(),
        });
    }

    /// Findings at `level`.
    pub fn at(&self, level: Level) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(move |finding| finding.level == level)
    }

    /// Number of error findings.
    pub fn error_count(&self) -> usize {
        self.at(Level::Error).count()
    }

    /// Number of files examined.
    pub fn files(&self) -> usize {
        self.files
    }

    /// Return true when no finding is an error.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Fold another report into this one.
    pub fn extend(&mut self, other: Self) {
        self.findings.extend(other.findings);
        self.files += other.files;
    }

    /// Render a markdown compatibility report for the analyzed path.
    pub fn render(&self, analyzed: &str) -> String {
        let mut out = String::from("# tctl Compatibility Report\n\n");
        out.push_str(&format!("Path analyzed: {analyzed}\n"));
        out.push_str(&format!("Files analyzed: {}\n\n", self.files()));

        if self.findings.is_empty() {
            out.push_str("✓ All files are tctl-compatible. No changes needed.\n");
            return out;
        }

        let sections = [
            (
                Level::Error,
                "Required Fixes (Errors)",
                "These must be fixed for the tool to work with tctl:",
            ),
            (
                Level::Warning,
                "Recommended Fixes (Warnings)",
                "These improve tool functionality:",
            ),
            (
                Level::Info,
                "Suggestions (Info)",
                "Optional improvements for better discoverability:",
            ),
        ];
        for (level, title, blurb) in sections {
            let findings: Vec<_> = self.at(level).collect();
            if findings.is_empty() {
                continue;
            }
            out.push_str(&format!("## {title}\n\n{blurb}\n\n"));
            for finding in findings {
                out.push_str(&format!(
                    "- **{}** (`{}`): {}\n",
                    finding.file.display(),
                    finding.code,
                    finding.message
                ));
            }
            out.push('\n');
        }

        out.push_str(FORMAT_HELP);
        out
    }
}

/// Reference block appended to reports with findings.
const FORMAT_HELP: &str = r#"## Required Docstring Format

Each Python tool file starts with a triple-quoted docstring (a shebang and comments may come first).
The docstring must contain an `@tool <name>` line. Other tags are optional but recommended.

**Example:**

```python
#!/usr/bin/env python3
"""
tool-name
Brief description of what this tool does.

@tool tool-name
@provides artifact-name
@output data/output.csv
@keywords keyword1, keyword2

@interface
--arg1: string, required - Description of arg1
--arg2: int, default=10 - Description of arg2
"""
```
"#;

/// Lint a file or every candidate file under a directory.
///
/// Files no scanner handles are ignored. A path that cannot be read is
/// itself reported as an error.
pub fn lint_path(path: &Path, languages: &Languages) -> Report {
    let mut report = Report::default();
    if path.is_dir() {
        for file in candidate_files(path) {
            if languages.scanner_for(&file).is_some() {
                lint_file(&file, &mut report);
            }
        }
    } else if path.exists() {
        lint_file(path, &mut report);
    } else {
        report.add(Level::Error, path, "F001", "Cannot access path");
    }
    report
}

/// Lint a single file and append its findings.
fn lint_file(path: &Path, report: &mut Report) {
    let file = normalize_path(path);
    report.files += 1;

    let contents = match fs::read_to_string(&file) {
        Ok(contents) => contents,
        Err(error) => {
            debug!(path = %file.display(), %error, "failed to read file");
            report.add(Level::Error, &file, "F001", format!("Cannot read file: {error}"));
            return;
        }
    };

    let Some(block) = extract_docblock(&contents) else {
        report.add(
            Level::Error,
            &file,
            "D001",
            "No module-level docstring. Add a triple-quoted docstring at the top of the file with an @tool <name> tag.",
        );
        return;
    };
    if !block.is_terminated() {
        report.add(
            Level::Error,
            &file,
            "D002",
            "Docstring is never closed. Add the closing triple quotes after the tags.",
        );
    }

    let text = block.text();
    let Some(tool) = parse_tags(text) else {
        let message = if text.contains("@tool") {
            "@tool tag found but could not parse. Check format: @tool <name>"
        } else {
            "Docstring exists but is missing the @tool tag. Add an '@tool <tool-name>' line inside the docstring."
        };
        report.add(Level::Error, &file, "T001", message);
        return;
    };

    if tool.provides.is_empty() {
        report.add(
            Level::Warning,
            &file,
            "T002",
            "Missing @provides tag. Add: @provides <artifact-name>",
        );
    }
    if tool.capabilities.is_empty() {
        report.add(
            Level::Warning,
            &file,
            "T003",
            "Missing @capability tags. Add at least one: @capability <what the tool does>",
        );
    }
    if tool.keywords.is_empty() {
        report.add(
            Level::Info,
            &file,
            "T004",
            "Missing @keywords tag (improves discoverability). Add: @keywords <word1>, <word2>",
        );
    }
    if tool.output.is_none() {
        report.add(
            Level::Warning,
            &file,
            "T005",
            "Missing @output tag. Add: @output <path-or-description>",
        );
    }
    if tool.boundaries.is_empty() {
        report.add(
            Level::Info,
            &file,
            "T006",
            "No @boundary tags (they tell readers what the tool does not do).",
        );
    }
    if Policy::from_name(&tool.freshness).is_none() {
        let valid: Vec<_> = Policy::ALL.iter().map(|policy| policy.name()).collect();
        report.add(
            Level::Error,
            &file,
            "T007",
            format!(
                "Invalid @freshness '{}'. Must be one of: {}",
                tool.freshness,
                valid.join(", ")
            ),
        );
    }
    if tool.description.is_empty() {
        report.add(
            Level::Info,
            &file,
            "T008",
            "Missing description. Add a description line after the title line in the docstring.",
        );
    }
    if tool.interface.is_empty() && !text.contains("@interface") {
        report.add(
            Level::Info,
            &file,
            "T009",
            "No @interface block. Consider documenting CLI arguments if the tool accepts any.",
        );
    }
    if !tool.interface.is_empty() && tool.examples.is_empty() {
        report.add(
            Level::Warning,
            &file,
            "T010",
            "Tool has CLI arguments but no @example. Add: @example <command-line-example>",
        );
    }
    if !tool.requires.is_empty() && tool.examples.is_empty() {
        report.add(
            Level::Info,
            &file,
            "T011",
            format!(
                "Tool requires '{}'. Consider adding an @example showing the full workflow.",
                tool.requires.join(", ")
            ),
        );
    }
}
