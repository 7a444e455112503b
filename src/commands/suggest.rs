//! Implementation of the `tctl where` command.

use crate::{
    catalog::Catalog,
    commands::{ColorChoice, print_no_sources},
    diagnostics::Diagnostics,
    error::Result,
    palette::{fmt_heading, fmt_label, fmt_tool_name},
    paths::display_path,
    search::{Match, WHERE_WEIGHTS, exclusions, search, suggest_name, terms},
};

/// Maximum number of placement candidates printed.
const MAX_MATCHES: usize = 5;

/// Maximum number of boundary exclusions printed.
const MAX_EXCLUSIONS: usize = 3;

/// Execute the where command.
pub async fn run(color: ColorChoice, feature: Vec<String>) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let catalog = Catalog::load(&mut diagnostics)?;
    let use_color = color.enabled();

    if catalog.has_no_sources() {
        print_no_sources();
        return Ok(());
    }

    let display_feature = feature.join(" ");
    let terms = terms(&feature);
    let matches = search(catalog.scan.registry.all(), &terms, WHERE_WEIGHTS);
    let excluded = exclusions(catalog.scan.registry.all(), &terms);

    println!();
    println!(
        "{}",
        fmt_heading(&format!("# Where should '{display_feature}' go?"), use_color)
    );
    println!();

    if !matches.is_empty() {
        println!("## Best matches");
        println!();
        for found in matches.iter().take(MAX_MATCHES) {
            print_candidate(found, use_color);
        }
    }

    if !excluded.is_empty() {
        println!("## Explicitly excluded");
        println!();
        println!("These tools have @boundary tags that exclude this feature:");
        println!();
        for exclusion in excluded.iter().take(MAX_EXCLUSIONS) {
            println!(
                "- {}: {}",
                fmt_tool_name(&exclusion.tool.name, use_color),
                exclusion.boundary
            );
        }
        println!();
    }

    if matches.is_empty() {
        println!("No existing tool matches this feature.");
        println!();
        println!("Create a new tool:");
        println!("  tctl new {}", suggest_name(&terms));
    }
    Ok(())
}

/// Print one placement candidate with the reasons it matched.
fn print_candidate(found: &Match<'_>, use_color: bool) {
    let tool = found.tool;
    println!("### {}", fmt_tool_name(&tool.name, use_color));
    if !tool.description.is_empty() {
        println!("{}", tool.description);
    }
    println!();
    println!("{} `{}`", fmt_label("File:", use_color), display_path(&tool.file));
    if !tool.provides.is_empty() {
        println!("{} {}", fmt_label("Provides:", use_color), tool.provides.join(", "));
    }

    println!();
    println!("Why this tool:");
    for reason in &found.reasons {
        println!("- {reason}");
    }

    if !tool.capabilities.is_empty() {
        println!();
        println!("Existing capabilities:");
        for capability in &tool.capabilities {
            println!("- {capability}");
        }
    }
    println!();
    println!("---");
    println!();
}
