//! Implementation of the `tctl status` command.

use crate::{
    catalog::Catalog,
    commands::{ColorChoice, print_no_sources},
    diagnostics::Diagnostics,
    error::Result,
    freshness,
    palette::{fmt_freshness, fmt_heading},
};

/// Execute the status command.
pub async fn run(color: ColorChoice) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let catalog = Catalog::load(&mut diagnostics)?;
    let use_color = color.enabled();

    if catalog.has_no_sources() {
        print_no_sources();
        return Ok(());
    }

    println!();
    println!("{}", fmt_heading("Data Status", use_color));
    println!();

    let mut shown = 0;
    for tool in catalog.scan.registry.all() {
        let Some(output) = tool.output_path() else {
            continue;
        };
        shown += 1;
        let status = freshness::check(&output, &tool.freshness);
        let data = tool.provides.first().unwrap_or(&tool.name);
        println!(
            "  {} {data:<24} {}",
            fmt_freshness(&status, use_color),
            status.message
        );
    }
    if shown == 0 {
        println!("  No tools with @output defined.");
    }
    println!();
    Ok(())
}
