//! Implementation of the `tctl show` command.

use textwrap::Options;

use crate::{
    catalog::Catalog,
    commands::{ColorChoice, print_no_sources},
    diagnostics::Diagnostics,
    error::{Error, Result},
    palette::{fmt_description, fmt_heading, fmt_label, fmt_path, fmt_tool_name},
    paths::display_path,
    tool::Tool,
};

/// Wrap width for prose fields.
const WRAP_WIDTH: usize = 76;

/// Execute the show command.
pub async fn run(color: ColorChoice, name: String, json: bool) -> Result<()> {
    let mut diagnostics = Diagnostics::new();
    let catalog = Catalog::load(&mut diagnostics)?;

    if catalog.has_no_sources() {
        print_no_sources();
        return Ok(());
    }

    let tool = catalog.tool(&name)?;
    if json {
        let output = serde_json::to_string_pretty(tool)
            .map_err(|error| Error::JsonSerialize { source: error })?;
        println!("{output}");
    } else {
        print!("{}", render_details(tool, color.enabled()));
    }
    Ok(())
}

/// Render every known field of a tool.
fn render_details(tool: &Tool, use_color: bool) -> String {
    let mut out = String::new();
    let label = |text: &str| fmt_label(text, use_color);
    let mut line = |text: String| {
        out.push_str(&text);
        out.push('\n');
    };

    line(String::new());
    line(format!("# {}", fmt_tool_name(&tool.name, use_color)));
    line(String::new());

    if !tool.description.is_empty() {
        for wrapped in wrap(&tool.description, "  ", "  ") {
            line(fmt_description(&wrapped, use_color));
        }
        line(String::new());
    }

    line(format!(
        "  {} {}",
        label("File:"),
        fmt_path(&display_path(&tool.file), use_color)
    ));
    line(format!("  {} {}", label("Language:"), tool.language));
    if let Some(version) = &tool.version {
        line(format!("  {} {version}", label("Version:")));
    }
    line(format!("  {} {}", label("Provides:"), tool.provides.join(", ")));
    if !tool.requires.is_empty() {
        line(format!("  {} {}", label("Requires:"), tool.requires.join(", ")));
    }
    line(format!(
        "  {} {}",
        label("Output:"),
        tool.output.as_deref().unwrap_or("-")
    ));
    line(format!("  {} {}", label("Freshness:"), tool.freshness));

    if !tool.capabilities.is_empty() {
        line(String::new());
        line(format!("  {}", fmt_heading("Capabilities:", use_color)));
        for capability in &tool.capabilities {
            wrap(capability, "    • ", "      ").into_iter().for_each(&mut line);
        }
    }

    if !tool.boundaries.is_empty() {
        line(String::new());
        line(format!("  {}", fmt_heading("Boundaries:", use_color)));
        for boundary in &tool.boundaries {
            wrap(boundary, "    ✗ ", "      ").into_iter().for_each(&mut line);
        }
    }

    if !tool.keywords.is_empty() {
        line(String::new());
        line(format!("  {} {}", label("Keywords:"), tool.keywords.join(", ")));
    }

    if !tool.interface.is_empty() {
        line(String::new());
        line(format!("  {}", fmt_heading("Interface:", use_color)));
        for (name, arg) in &tool.interface {
            let mut spec = format!("    {name}: {}", arg.kind);
            if arg.required {
                spec.push_str(" (required)");
            }
            if let Some(default) = &arg.default {
                spec.push_str(&format!(" [default: {default}]"));
            }
            line(spec);
            if !arg.description.is_empty() {
                wrap(&arg.description, "      ", "      ")
                    .into_iter()
                    .for_each(&mut line);
            }
        }
    }

    if !tool.examples.is_empty() {
        line(String::new());
        line(format!("  {}", fmt_heading("Examples:", use_color)));
        for example in &tool.examples {
            line(format!("    $ {example}"));
        }
    }

    line(String::new());
    out
}

/// Wrap prose with a first-line and continuation indent.
fn wrap(text: &str, initial: &str, subsequent: &str) -> Vec<String> {
    let options = Options::new(WRAP_WIDTH)
        .initial_indent(initial)
        .subsequent_indent(subsequent);
    textwrap::wrap(text, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{render_details, wrap};
    use crate::tool::{Arg, Tool};

    #[test]
    fn renders_all_sections_without_color() {
        let mut tool = Tool {
            name: "fetch".to_string(),
            description: "Fetch prices.".to_string(),
            file: PathBuf::from("/srv/tools/fetch.py"),
            language: "python".to_string(),
            provides: vec!["prices".to_string()],
            output: Some("data/prices.csv".to_string()),
            capabilities: vec!["Download quotes".to_string()],
            boundaries: vec!["Does not trade".to_string()],
            examples: vec!["tctl run fetch --days 3".to_string()],
            ..Tool::default()
        };
        tool.interface.insert(
            "--days".to_string(),
            Arg {
                name: "--days".to_string(),
                kind: "int".to_string(),
                required: true,
                default: Some("3".to_string()),
                description: "History length".to_string(),
            },
        );

        let rendered = render_details(&tool, false);
        assert!(rendered.contains("# fetch\n"));
        assert!(rendered.contains("  Output: data/prices.csv\n"));
        assert!(rendered.contains("  Freshness: manual\n"));
        assert!(rendered.contains("    • Download quotes\n"));
        assert!(rendered.contains("    ✗ Does not trade\n"));
        assert!(rendered.contains("    --days: int (required) [default: 3]\n"));
        assert!(rendered.contains("    $ tctl run fetch --days 3\n"));
        assert!(!rendered.contains("Requires:"));
    }

    #[test]
    fn wraps_long_text_with_hanging_indent() {
        let text = "word ".repeat(40);
        let lines = wrap(text.trim(), "    • ", "      ");
        assert!(lines.len() > 1);
        assert!(lines[0].starts_with("    • word"));
        assert!(lines[1].starts_with("      word"));
        assert!(lines.iter().all(|line| line.chars().count() <= 76));
    }
}
