//! Python tools: docstring scanning and interpreter selection.

use std::{fs, io, path::Path};

use tracing::debug;

use crate::{
    docblock::extract_docblock,
    error::{Error, Result},
    runner::{Invocation, Runner, find_program},
    scanner::{ScannedTool, Scanner},
    tags::parse_tags,
    tool::Tool,
};

/// Language tag for Python tools.
pub const LANGUAGE: &str = "python";

/// Reads tool metadata from a Python module docstring.
#[derive(Debug, Default)]
pub struct PythonScanner;

impl Scanner for PythonScanner {
    fn language(&self) -> &'static str {
        LANGUAGE
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".py"]
    }

    fn scan(&self, path: &Path) -> io::Result<Option<ScannedTool>> {
        let contents = fs::read_to_string(path)?;
        let Some(block) = extract_docblock(&contents) else {
            return Ok(None);
        };
        let Some(mut tool) = parse_tags(block.text()) else {
            return Ok(None);
        };
        tool.file = path.to_path_buf();
        tool.language = LANGUAGE.to_string();
        Ok(Some(ScannedTool {
            tool,
            terminated: block.is_terminated(),
        }))
    }
}

/// Runs Python tools with a configured or discovered interpreter.
#[derive(Debug, Default)]
pub struct PythonRunner {
    /// Interpreter command from settings, split with shell rules.
    interpreter: Option<String>,
}

impl PythonRunner {
    /// Create a runner, optionally pinned to an interpreter command.
    pub fn new(interpreter: Option<String>) -> Self {
        Self { interpreter }
    }

    /// Resolve the interpreter command prefix.
    ///
    /// Order: configured command, `uv run python` inside a `uv` project,
    /// `python3`, then `python`.
    fn interpreter(&self) -> Result<Vec<String>> {
        if let Some(command) = &self.interpreter {
            let parts = shell_words::split(command).map_err(|error| Error::InterpreterParse {
                command: command.clone(),
                message: error.to_string(),
            })?;
            if parts.is_empty() {
                return Err(Error::InterpreterParse {
                    command: command.clone(),
                    message: "command is empty".to_string(),
                });
            }
            return Ok(parts);
        }

        if let Some(uv) = find_program("uv")
            && Path::new("pyproject.toml").is_file()
        {
            debug!("using uv for pyproject.toml in working directory");
            return Ok(vec![
                uv.to_string_lossy().to_string(),
                "run".to_string(),
                "python".to_string(),
            ]);
        }

        ["python3", "python"]
            .into_iter()
            .find_map(find_program)
            .map(|path| vec![path.to_string_lossy().to_string()])
            .ok_or_else(|| Error::InterpreterNotFound {
                language: LANGUAGE.to_string(),
            })
    }
}

impl Runner for PythonRunner {
    fn language(&self) -> &'static str {
        LANGUAGE
    }

    fn can_run(&self, tool: &Tool) -> bool {
        tool.language == LANGUAGE
            || tool.file.extension().is_some_and(|extension| extension == "py")
    }

    fn invocation(&self, tool: &Tool, args: &[String]) -> Result<Invocation> {
        let mut command = self.interpreter()?.into_iter();
        let program = command.next().ok_or_else(|| Error::InterpreterNotFound {
            language: LANGUAGE.to_string(),
        })?;
        let mut full_args: Vec<String> = command.collect();
        full_args.push(tool.file.to_string_lossy().to_string());
        full_args.extend(args.iter().cloned());
        Ok(Invocation {
            program,
            args: full_args,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use tempfile::tempdir;

    use super::{PythonRunner, PythonScanner};
    use crate::{
        error::Error,
        runner::Runner,
        scanner::Scanner,
        tool::Tool,
    };

    #[test]
    fn scans_module_docstring() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("fetch.py");
        fs::write(
            &path,
            "#!/usr/bin/env python3\n\"\"\"\nfetch.py\nFetch things.\n\n@tool fetch\n@provides things\n\"\"\"\nimport sys\n",
        )
        .expect("write");

        let scanner = PythonScanner;
        assert!(scanner.can_scan(&path));
        assert!(!scanner.can_scan(&dir.path().join("fetch.pyc")));

        let scanned = scanner.scan(&path).expect("scan").expect("tool");
        assert!(scanned.terminated);
        assert_eq!(scanned.tool.name, "fetch");
        assert_eq!(scanned.tool.description, "Fetch things.");
        assert_eq!(scanned.tool.language, "python");
        assert_eq!(scanned.tool.file, path);
    }

    #[test]
    fn files_without_tags_are_not_tools() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("helper.py");
        fs::write(&path, "\"\"\"Helpers.\"\"\"\n").expect("write");
        assert!(PythonScanner.scan(&path).expect("scan").is_none());

        fs::write(&path, "import os\n").expect("write");
        assert!(PythonScanner.scan(&path).expect("scan").is_none());
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempdir().expect("tempdir");
        assert!(PythonScanner.scan(&dir.path().join("missing.py")).is_err());
    }

    #[test]
    fn configured_interpreter_prefixes_the_script() {
        let runner = PythonRunner::new(Some("uv run --quiet python".to_string()));
        let tool = Tool {
            name: "fetch".to_string(),
            file: PathBuf::from("/tools/fetch.py"),
            language: "python".to_string(),
            ..Tool::default()
        };
        let invocation = runner
            .invocation(&tool, &["--days".to_string(), "3".to_string()])
            .expect("invocation");
        assert_eq!(invocation.program, "uv");
        assert_eq!(
            invocation.args,
            vec!["run", "--quiet", "python", "/tools/fetch.py", "--days", "3"]
        );
    }

    #[test]
    fn rejects_unparseable_interpreter() {
        let runner = PythonRunner::new(Some("python \"unterminated".to_string()));
        let tool = Tool {
            name: "fetch".to_string(),
            file: PathBuf::from("/tools/fetch.py"),
            ..Tool::default()
        };
        let error = runner.invocation(&tool, &[]).expect_err("parse error");
        assert!(matches!(error, Error::InterpreterParse { .. }));
    }

    #[test]
    fn runs_python_files_by_language_or_extension() {
        let runner = PythonRunner::default();
        let by_extension = Tool {
            file: PathBuf::from("x.py"),
            ..Tool::default()
        };
        let other = Tool {
            file: PathBuf::from("x.sh"),
            language: "shell".to_string(),
            ..Tool::default()
        };
        assert!(runner.can_run(&by_extension));
        assert!(!runner.can_run(&other));
    }
}
