//! Implementation of the `tctl remove` command.

use inquire::{Confirm, error::InquireError};

use crate::{
    config::Config,
    diagnostics::Diagnostics,
    error::{Error, Result},
    paths::display_path,
};

/// Execute the remove command.
pub async fn run(path_or_name: String, force: bool) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let mut config = Config::load(&mut diagnostics)?;

    if !force && !confirm(&format!("Unregister source '{path_or_name}'?"))? {
        println!("Canceled.");
        return Ok(());
    }

    for source in config.remove_source(&path_or_name)? {
        println!("✓ Removed: {} ({})", source.name, display_path(&source.path));
    }
    Ok(())
}

/// Prompt for confirmation.
fn confirm(message: &str) -> Result<bool> {
    match Confirm::new(message).with_default(false).prompt() {
        Ok(value) => Ok(value),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
            Err(Error::PromptCanceled)
        }
        Err(error) => Err(Error::PromptFailed {
            message: error.to_string(),
        }),
    }
}
