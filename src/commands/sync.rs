//! Implementation of the `tctl sync` command.

use crate::{
    catalog::Catalog,
    commands::print_no_sources,
    config::Config,
    diagnostics::Diagnostics,
    error::{Error, Result},
};

/// Execute the sync command.
///
/// Scan findings (duplicate names, ambiguous providers, unterminated
/// blocks) are printed as warnings and fail the command; tools without
/// `@provides` are only noted.
pub async fn run() -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let config = Config::load(&mut diagnostics)?;

    if config.sources().is_empty() {
        print_no_sources();
        return Ok(());
    }

    println!("[sync] Scanning {} source(s)...", config.sources().len());
    let catalog = Catalog::from_config(config, &mut diagnostics);
    println!("[sync] Found {} tool(s)", catalog.scan.registry.len());
    if !catalog.config.intents().is_empty() {
        println!("[sync] Found {} intent(s)", catalog.config.intents().len());
    }

    println!("[sync] Validating...");
    for tool in catalog.scan.registry.all() {
        if tool.provides.is_empty() {
            println!("  ⚠ {}: missing @provides tag", tool.name);
        }
    }

    let count = catalog.scan.finding_count();
    if count > 0 {
        println!();
        println!("[sync] ⚠ {count} problem(s) found. Run 'tctl lint' for details.");
        println!();
        return Err(Error::SyncFailed { count });
    }
    println!("[sync] ✓ All tools valid");
    println!();
    Ok(())
}
