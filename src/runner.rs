//! Tool execution.

use std::{
    env,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use tracing::debug;

use crate::{
    error::{Error, Result},
    tool::Tool,
};

/// A resolved command line for running a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to launch.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<String>,
}

/// Builds command lines for tools of one language.
pub trait Runner {
    /// Language tag this runner handles.
    fn language(&self) -> &'static str;

    /// Return true if this runner can execute `tool`.
    fn can_run(&self, tool: &Tool) -> bool;

    /// Build the command line that runs `tool` with `args`.
    fn invocation(&self, tool: &Tool, args: &[String]) -> Result<Invocation>;
}

/// Runs a tool to completion and reports its exit code.
pub trait Executor {
    /// Run `tool` with `args`, blocking until it exits.
    fn execute(&mut self, tool: &Tool, args: &[String]) -> Result<i32>;
}

/// Launch an invocation with inherited stdio and wait for it.
///
/// A process terminated by a signal reports exit code 1.
pub fn run_inherited(tool: &Tool, invocation: &Invocation) -> Result<i32> {
    debug!(tool = %tool.name, program = %invocation.program, args = ?invocation.args, "running tool");
    let status = Command::new(&invocation.program)
        .args(&invocation.args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|error| Error::Spawn {
            tool: tool.name.clone(),
            program: invocation.program.clone(),
            source: error,
        })?;
    Ok(status.code().unwrap_or(1))
}

/// Locate an executable on `PATH`.
pub fn find_program(name: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

/// Return true if `path` is a file the current user may execute.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// Return true if `path` is a file the current user may execute.
#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}
