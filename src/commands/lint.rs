//! Implementation of the `tctl lint` command.

use std::path::PathBuf;

use crate::{
    commands::print_no_sources,
    config::Config,
    diagnostics::Diagnostics,
    error::{Error, Result},
    language::Languages,
    lint::{Report, lint_path},
    paths::display_path,
};

/// Execute the lint command.
///
/// Without a path every registered source is checked.
pub async fn run(path: Option<PathBuf>) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let config = Config::load(&mut diagnostics)?;
    let languages = Languages::builtin(config.settings());

    let (analyzed, report) = match path {
        Some(path) => (display_path(&path), lint_path(&path, &languages)),
        None => {
            if config.sources().is_empty() {
                print_no_sources();
                return Ok(());
            }
            let mut report = Report::default();
            for source in config.sources() {
                report.extend(lint_path(&source.path, &languages));
            }
            let analyzed = config
                .sources()
                .iter()
                .map(|source| display_path(&source.path))
                .collect::<Vec<_>>()
                .join(", ");
            (analyzed, report)
        }
    };

    print!("{}", report.render(&analyzed));
    if !report.is_ok() {
        return Err(Error::LintFailed {
            count: report.error_count(),
        });
    }
    Ok(())
}
