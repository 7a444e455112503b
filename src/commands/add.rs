//! Implementation of the `tctl add` command.

use crate::{
    config::Config, diagnostics::Diagnostics, error::Result, language::Languages,
    paths::display_path,
};

/// Execute the add command.
pub async fn run(path: String, name: Option<String>) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let mut config = Config::load(&mut diagnostics)?;
    let source = config.add_source(&path, name.as_deref())?.clone();

    println!("✓ Registered: {}", display_path(&source.path));
    println!("  Name: {}", source.name);

    let languages = Languages::builtin(config.settings());
    let scan = languages.scan_directory(&source.path);
    println!("  Found {} tool(s)", scan.registry.len());
    scan.report(&mut diagnostics);

    println!();
    println!("Run 'tctl list' to see every registered tool.");
    Ok(())
}
