//! Error types for the tctl CLI.

use std::{env::VarError, io, path::PathBuf, process::ExitCode, result::Result as StdResult};

use thiserror::Error;

/// Result type for tctl operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors that can occur while running the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration file could not be read.
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_yaml::Error,
    },
    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {source}")]
    ConfigSerialize {
        /// Underlying serialization error.
        source: serde_yaml::Error,
    },
    /// A configuration file could not be written.
    #[error("Failed to write config at {path}: {source}")]
    ConfigWrite {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Home directory resolution failed.
    #[error("Failed to resolve the home directory.")]
    HomeDirMissing,
    /// A user-supplied path could not be expanded.
    #[error("Invalid path: {path}: {source}")]
    PathExpansion {
        /// Input path that failed to expand.
        path: String,
        /// Underlying expansion error.
        source: shellexpand::LookupError<VarError>,
    },
    /// A path required for operation does not exist.
    #[error("Path does not exist: {path}")]
    PathMissing {
        /// Path that does not exist.
        path: PathBuf,
    },
    /// A path that must be a directory is not one.
    #[error("Path is not a directory: {path}")]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },
    /// A required path already exists.
    #[error("File already exists: {path}")]
    PathExists {
        /// Path that already exists.
        path: PathBuf,
    },
    /// The source directory is already registered.
    #[error("Already registered: {path}")]
    SourceRegistered {
        /// Registered path.
        path: PathBuf,
    },
    /// Another source already uses this name.
    #[error("Source name '{name}' is already used by {path}")]
    SourceNameTaken {
        /// Requested name.
        name: String,
        /// Path registered under that name.
        path: PathBuf,
    },
    /// No registered source matches a path or name.
    #[error("Not registered: {name}")]
    SourceNotRegistered {
        /// Path or name that was given.
        name: String,
    },
    /// A named source was requested but not found.
    #[error("Unknown source: {name}")]
    UnknownSource {
        /// Requested source name.
        name: String,
    },
    /// A tool could not be found by name.
    #[error("Unknown tool: {name}\nRun 'tctl list' to see available tools.")]
    ToolNotFound {
        /// Missing tool name.
        name: String,
    },
    /// A tool file could not be written.
    #[error("Failed to write tool file at {path}: {source}")]
    ToolWrite {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A template could not be rendered.
    #[error("Failed to render template: {message}")]
    TemplateRender {
        /// Error message describing the render failure.
        message: String,
    },
    /// The configured interpreter command could not be parsed.
    #[error("Invalid interpreter command `{command}`: {message}")]
    InterpreterParse {
        /// Command as configured.
        command: String,
        /// Error message describing the parse failure.
        message: String,
    },
    /// No interpreter for a language was found on PATH.
    #[error("{language} interpreter not found")]
    InterpreterNotFound {
        /// Language that needed an interpreter.
        language: String,
    },
    /// No runner handles a tool's language.
    #[error("Unsupported language: {language}")]
    UnsupportedLanguage {
        /// Language of the tool.
        language: String,
    },
    /// A tool process could not be started.
    #[error("Failed to run `{program}` for tool '{tool}': {source}")]
    Spawn {
        /// Tool being run.
        tool: String,
        /// Program that failed to start.
        program: String,
        /// Underlying spawn error.
        source: io::Error,
    },
    /// A tool exited with a non-zero status.
    #[error("Tool '{tool}' exited with code {code}")]
    ToolExit {
        /// Tool name.
        tool: String,
        /// Exit code reported by the process.
        code: i32,
    },
    /// No tool provides the requested data.
    #[error("Unknown data: {target}\nNo tool provides '{target}'")]
    UnknownData {
        /// Requested artifact name.
        target: String,
    },
    /// A tool producing a dependency failed.
    #[error("{tool} failed with code {code}")]
    ProductionFailed {
        /// Tool that was run.
        tool: String,
        /// Exit code reported by the process.
        code: i32,
    },
    /// A dependency cycle was found while resolving.
    #[error("Dependency cycle: {chain}")]
    DependencyCycle {
        /// The cycle, rendered as `a -> b -> a`.
        chain: String,
    },
    /// An interactive prompt was interrupted or canceled.
    #[error("Prompt canceled.")]
    PromptCanceled,
    /// An interactive prompt failed.
    #[error("Prompt failed: {message}")]
    PromptFailed {
        /// Error message describing the prompt failure.
        message: String,
    },
    /// Output could not be serialized as JSON.
    #[error("Failed to serialize output: {source}")]
    JsonSerialize {
        /// Underlying serialization error.
        source: serde_json::Error,
    },
    /// Sync found problems in the scanned sources.
    #[error("Sync found {count} problem(s)")]
    SyncFailed {
        /// Number of scan findings.
        count: usize,
    },
    /// Lint found errors.
    #[error("Lint failed with {count} error(s)")]
    LintFailed {
        /// Number of error findings.
        count: usize,
    },
}

impl Error {
    /// Map errors to exit codes for CLI termination.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::ToolExit { code, .. } => ExitCode::from(u8::try_from(*code).unwrap_or(1)),
            _ => ExitCode::from(1),
        }
    }
}
