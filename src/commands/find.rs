//! Implementation of the `tctl find` command.

use crate::{
    catalog::Catalog,
    commands::{ColorChoice, print_no_sources},
    diagnostics::Diagnostics,
    error::Result,
    palette::{fmt_heading, fmt_label, fmt_tool_name},
    paths::display_path,
    search::{FIND_WEIGHTS, Match, search, terms},
};

/// Maximum number of matches printed.
const MAX_SHOWN: usize = 10;

/// Execute the find command.
pub async fn run(color: ColorChoice, query: Vec<String>) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let catalog = Catalog::load(&mut diagnostics)?;
    let use_color = color.enabled();

    if catalog.has_no_sources() {
        print_no_sources();
        return Ok(());
    }

    let display_query = query.join(" ");
    let matches = search(catalog.scan.registry.all(), &terms(&query), FIND_WEIGHTS);
    if matches.is_empty() {
        println!("No tools found matching: {display_query}");
        println!();
        println!("Try:");
        println!("  tctl what     - See all keywords");
        println!("  tctl list     - See all tools");
        return Ok(());
    }

    println!();
    println!(
        "{}",
        fmt_heading(&format!("# Tools matching '{display_query}'"), use_color)
    );
    println!();
    for found in matches.iter().take(MAX_SHOWN) {
        print_match(found, use_color);
    }
    if matches.len() > MAX_SHOWN {
        println!("... and {} more matches", matches.len() - MAX_SHOWN);
    }
    Ok(())
}

/// Print one scored match.
fn print_match(found: &Match<'_>, use_color: bool) {
    let tool = found.tool;
    println!("## {}", fmt_tool_name(&tool.name, use_color));
    if !tool.description.is_empty() {
        println!("{}", tool.description);
    }
    println!();
    println!("{} `{}`", fmt_label("File:", use_color), display_path(&tool.file));
    if !tool.provides.is_empty() {
        println!("{} {}", fmt_label("Provides:", use_color), tool.provides.join(", "));
    }
    if !tool.requires.is_empty() {
        println!("{} {}", fmt_label("Requires:", use_color), tool.requires.join(", "));
    }
    if let Some(output) = &tool.output {
        println!("{} {output}", fmt_label("Output:", use_color));
    }
    println!(
        "{} {} ({})",
        fmt_label("Score:", use_color),
        found.score,
        found.reasons.join("; ")
    );

    if !tool.capabilities.is_empty() {
        println!();
        println!("Capabilities:");
        for capability in &tool.capabilities {
            println!("- {capability}");
        }
    }
    if !tool.boundaries.is_empty() {
        println!();
        println!("Boundaries:");
        for boundary in &tool.boundaries {
            println!("- {boundary}");
        }
    }
    println!();
    println!("---");
    println!();
}
