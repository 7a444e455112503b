//! CLI parsing and command dispatch.

use std::{env, io, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::{commands, error::Result};

/// Parsed command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "tctl",
    version,
    about = "Discover, search, and run your personal tool library"
)]
struct Cli {
    /// Control colored output.
    #[arg(long, value_enum, default_value = "auto", global = true)]
    color: ColorMode,
    /// Log debug diagnostics to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    /// Command to execute (defaults to list).
    #[command(subcommand)]
    command: Option<Command>,
}

/// Supported color output modes.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorMode {
    /// Only colorize when stdout is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

// Commands are ordered alphabetically - maintain this order.
/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Register a directory as a tool source.
    Add {
        /// Directory to register.
        #[arg(default_value = ".")]
        path: String,
        /// Source name (defaults to the directory name).
        #[arg(long, short = 'n')]
        name: Option<String>,
    },
    /// Find tools by keyword.
    Find {
        /// Search terms.
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Ensure data or an intent is fresh, producing it when needed.
    #[command(alias = "ensure")]
    Get {
        /// Artifact or intent name.
        target: String,
        /// Fail on dependency cycles instead of warning.
        #[arg(long)]
        strict: bool,
    },
    /// Report what a file or directory needs to work as a tool.
    Lint {
        /// File or directory to check (defaults to every source).
        path: Option<PathBuf>,
    },
    /// List all tools.
    #[command(alias = "ls")]
    List {
        /// Only list tools from this source.
        #[arg(long, short = 's')]
        source: Option<String>,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Create a new tool from a template.
    New {
        /// Tool name.
        name: String,
        /// Directory to write into.
        #[arg(long, short = 'o', default_value = ".")]
        output: PathBuf,
    },
    /// Unregister a tool source.
    #[command(alias = "rm")]
    Remove {
        /// Source path or name.
        source: String,
        /// Remove without prompting.
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Run a tool directly, passing arguments through.
    Run {
        /// Tool name.
        tool: String,
        /// Arguments for the tool.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Show everything known about a tool.
    Show {
        /// Tool name.
        tool: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// List registered sources.
    Sources {
        /// Also list the tools in each source.
        #[arg(long, short = 't')]
        tools: bool,
    },
    /// Show freshness of every tool output.
    Status,
    /// Rescan sources and report problems.
    Sync,
    /// Show available data and common keywords.
    What,
    /// Suggest which tool a new feature belongs in.
    Where {
        /// Feature description.
        #[arg(required = true)]
        feature: Vec<String>,
    },
}

/// Run the requested command.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let color = cli.color.into_choice();

    // Match arms are ordered alphabetically - maintain this order.
    match cli.command.unwrap_or(Command::List {
        source: None,
        json: false,
    }) {
        Command::Add { path, name } => commands::add::run(path, name).await,
        Command::Find { terms } => commands::find::run(color, terms).await,
        Command::Get { target, strict } => commands::get::run(target, strict).await,
        Command::Lint { path } => commands::lint::run(path).await,
        Command::List { source, json } => commands::list::run(color, source, json).await,
        Command::New { name, output } => commands::new::run(name, output).await,
        Command::Remove { source, force } => commands::remove::run(source, force).await,
        Command::Run { tool, args } => commands::run::run(tool, args).await,
        Command::Show { tool, json } => commands::show::run(color, tool, json).await,
        Command::Sources { tools } => commands::sources::run(color, tools).await,
        Command::Status => commands::status::run(color).await,
        Command::Sync => commands::sync::run().await,
        Command::What => commands::what::run(color).await,
        Command::Where { feature } => commands::suggest::run(color, feature).await,
    }
}

/// Install a stderr log subscriber when `--verbose` or `RUST_LOG` asks for one.
fn init_logging(verbose: bool) {
    let from_env = env::var_os(EnvFilter::DEFAULT_ENV).is_some();
    if !verbose && !from_env {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tctl=debug"));
    if let Err(error) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("Warning: failed to initialize logging: {error}");
    }
}

impl ColorMode {
    /// Convert a CLI color mode into a color choice.
    fn into_choice(self) -> commands::ColorChoice {
        match self {
            Self::Auto => commands::ColorChoice::Auto,
            Self::Always => commands::ColorChoice::Always,
            Self::Never => commands::ColorChoice::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Command};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_passes_hyphenated_arguments_through() {
        let cli = Cli::parse_from(["tctl", "run", "fetch", "--days", "3"]);
        match cli.command {
            Some(Command::Run { tool, args }) => {
                assert_eq!(tool, "fetch");
                assert_eq!(args, vec!["--days", "3"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn get_accepts_strict() {
        let cli = Cli::parse_from(["tctl", "--verbose", "get", "prices", "--strict"]);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Some(Command::Get { ref target, strict: true }) if target == "prices"
        ));
    }
}
