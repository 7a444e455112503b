//! Implementation of the `tctl what` command.

use crate::{
    catalog::Catalog,
    commands::{ColorChoice, print_no_sources},
    diagnostics::Diagnostics,
    error::Result,
    palette::{fmt_description, fmt_heading},
    search::{keyword_map, top_keywords},
};

/// Number of keywords listed.
const TOP_KEYWORDS: usize = 15;

/// Number of example tools shown per keyword.
const TOOLS_PER_KEYWORD: usize = 2;

/// Execute the what command.
pub async fn run(color: ColorChoice) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let catalog = Catalog::load(&mut diagnostics)?;
    let use_color = color.enabled();

    if catalog.has_no_sources() {
        print_no_sources();
        return Ok(());
    }
    if catalog.scan.registry.is_empty() {
        println!("No tools found.");
        return Ok(());
    }

    println!();
    println!("{}", fmt_heading("DATA AVAILABLE:", use_color));
    println!();
    for tool in catalog.scan.registry.all() {
        for artifact in &tool.provides {
            println!("  {artifact:<24} → tctl get {artifact}");
        }
    }
    let intents = catalog.config.intents();
    if !intents.is_empty() {
        println!();
        println!("{}", fmt_heading("INTENTS:", use_color));
        println!();
        for (name, intent) in intents {
            println!(
                "  {name:<24} → {}",
                fmt_description(&intent.includes.join(", "), use_color)
            );
        }
    }

    let map = keyword_map(catalog.scan.registry.all());
    println!();
    println!("{}", fmt_heading("KEYWORDS:", use_color));
    println!();
    for (keyword, tools) in top_keywords(&map, TOP_KEYWORDS) {
        let examples: Vec<_> = tools
            .iter()
            .take(TOOLS_PER_KEYWORD)
            .map(String::as_str)
            .collect();
        println!("  '{keyword}' → {}", examples.join(", "));
    }

    println!();
    println!("Run 'tctl find <keyword>' for specific matching");
    println!();
    Ok(())
}
