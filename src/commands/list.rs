//! Implementation of the `tctl list` command.

use crate::{
    catalog::Catalog,
    commands::{ColorChoice, print_no_sources},
    config::Source,
    diagnostics::Diagnostics,
    error::{Error, Result},
    palette::{fmt_description, fmt_heading, fmt_label, fmt_tool_name},
    tool::Tool,
};

/// Column width for tool names.
const NAME_WIDTH: usize = 24;

/// Execute the list command.
pub async fn run(color: ColorChoice, source_name: Option<String>, json: bool) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let catalog = Catalog::load(&mut diagnostics)?;
    let use_color = color.enabled();

    if catalog.has_no_sources() {
        print_no_sources();
        return Ok(());
    }

    let tools: Vec<&Tool> = match &source_name {
        Some(name) => {
            let source = catalog
                .config
                .find_source(name)
                .ok_or_else(|| Error::UnknownSource { name: name.clone() })?;
            catalog.tools_in(source).collect()
        }
        None => catalog.scan.registry.all().collect(),
    };

    if json {
        let output = serde_json::to_string_pretty(&tools)
            .map_err(|error| Error::JsonSerialize { source: error })?;
        println!("{output}");
        return Ok(());
    }

    if tools.is_empty() {
        println!("No tools found.");
        return Ok(());
    }

    println!();
    println!("{}", fmt_heading("Tools:", use_color));
    for tool in tools {
        let source = source_label(catalog.config.sources(), tool);
        let name = fmt_tool_name(&format!("{:<NAME_WIDTH$}", tool.name), use_color);
        let tag = fmt_description(&format!("[{source}]"), use_color);
        if tool.provides.is_empty() {
            println!("  {name} {tag}");
        } else {
            println!("  {name} {tag} → {}", tool.provides.join(", "));
        }
        if let Some(output) = &tool.output {
            println!(
                "  {:<NAME_WIDTH$} {} {output}",
                "",
                fmt_label("output:", use_color)
            );
        }
    }
    println!();

    diagnostics.print_warning_summary();
    Ok(())
}

/// Name of the source a tool belongs to, or its parent directory name.
fn source_label(sources: &[Source], tool: &Tool) -> String {
    sources
        .iter()
        .find(|source| tool.file.starts_with(&source.path) && !source.name.is_empty())
        .map(|source| source.name.clone())
        .unwrap_or_else(|| {
            tool.dir()
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default()
        })
}
