//! Implementation of the `tctl run` command.

use crate::{
    catalog::Catalog,
    commands::print_no_sources,
    diagnostics::Diagnostics,
    error::{Error, Result},
    runner::Executor,
};

/// Execute the run command, failing with the tool's exit code when it fails.
pub async fn run(name: String, args: Vec<String>) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let mut catalog = Catalog::load(&mut diagnostics)?;

    if catalog.has_no_sources() {
        print_no_sources();
        return Ok(());
    }

    let tool = catalog.tool(&name)?.clone();
    println!("[tctl] running: {name}");
    let code = catalog.languages.execute(&tool, &args)?;
    if code != 0 {
        return Err(Error::ToolExit { tool: name, code });
    }
    Ok(())
}
