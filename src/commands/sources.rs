//! Implementation of the `tctl sources` command.

use crate::{
    catalog::Catalog,
    commands::{ColorChoice, print_no_sources},
    config::Config,
    diagnostics::Diagnostics,
    error::Result,
    palette::{fmt_error, fmt_heading, fmt_ok, fmt_path, fmt_tool_name},
    paths::display_path,
};

/// Execute the sources command.
pub async fn run(color: ColorChoice, show_tools: bool) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let config = Config::load(&mut diagnostics)?;
    let use_color = color.enabled();

    if config.sources().is_empty() {
        print_no_sources();
        return Ok(());
    }

    let catalog = show_tools.then(|| Catalog::from_config(config.clone(), &mut diagnostics));

    println!();
    println!("{}", fmt_heading("Registered sources:", use_color));
    println!();

    for source in config.sources() {
        let marker = if source.path.is_dir() {
            fmt_ok("✓", use_color)
        } else {
            fmt_error("✗", use_color)
        };
        let name = if source.name.is_empty() {
            "(unnamed)"
        } else {
            source.name.as_str()
        };
        println!(
            "  {marker} {name:<16} {}",
            fmt_path(&display_path(&source.path), use_color)
        );

        if let Some(catalog) = &catalog {
            for tool in catalog.tools_in(source) {
                let provides = tool
                    .provides
                    .first()
                    .map(|artifact| format!(" → {artifact}"))
                    .unwrap_or_default();
                println!("      • {}{provides}", fmt_tool_name(&tool.name, use_color));
            }
        }
    }

    println!();
    println!("Config: {}", display_path(config.dir()));
    Ok(())
}
