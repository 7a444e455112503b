//! `@tag` parsing for documentation blocks.
//!
//! The tag syntax is the on-disk format shared with every annotated
//! script, so tag spellings and the line rules here are stable:
//!
//! ```text
//! fetch_prices.py
//! Download daily closing prices.
//!
//! @tool fetch-prices
//! @provides prices
//! @output data/prices.csv
//! @freshness daily
//! @interface
//!   --symbols: string, required - Comma separated tickers
//! @example tctl run fetch-prices --symbols AAPL
//! ```
//!
//! Parsing is deliberately permissive: a malformed line is dropped or
//! yields a default value, and only a missing `@tool` name makes a block
//! "not a tool".

use std::collections::BTreeMap;

use crate::tool::{Arg, Tool};

/// Prefix marking a tag line.
const TAG_MARKER: char = '@';
/// Prefix marking an argument line inside `@interface`.
const FLAG_PREFIX: &str = "--";
/// Separator between an argument's spec and its description.
const DESCRIPTION_SEPARATOR: &str = " - ";
/// Type recorded for arguments that do not declare one.
const DEFAULT_ARG_TYPE: &str = "string";

/// Parse a documentation block into a tool descriptor.
///
/// Returns `None` when the block has no `@tool` tag or the name is empty.
/// The returned tool has no `file` or `language`; the scanner fills them.
pub fn parse_tags(block: &str) -> Option<Tool> {
    let mut tool = Tool::default();
    let mut in_interface = false;
    let mut description_lines = Vec::new();

    for line in block.lines() {
        let trimmed = line.trim();

        if in_interface {
            if trimmed.starts_with(FLAG_PREFIX) {
                if let Some(arg) = parse_interface_line(trimmed) {
                    tool.interface.insert(arg.name.clone(), arg);
                }
                continue;
            }
            if !trimmed.starts_with(TAG_MARKER) {
                continue;
            }
            in_interface = false;
        }

        if let Some(value) = tag_value(trimmed, "@tool ") {
            tool.name = value.to_string();
        } else if let Some(value) = tag_value(trimmed, "@version ") {
            tool.version = Some(value.to_string());
        } else if let Some(value) = tag_value(trimmed, "@provides ") {
            tool.provides.extend(value.split_whitespace().map(str::to_string));
        } else if let Some(value) = tag_value(trimmed, "@requires ") {
            tool.requires.extend(value.split_whitespace().map(str::to_string));
        } else if let Some(value) = tag_value(trimmed, "@output ") {
            tool.output = Some(value.to_string());
        } else if let Some(value) = tag_value(trimmed, "@freshness ") {
            tool.freshness = value.to_string();
        } else if let Some(value) = tag_value(trimmed, "@capability ") {
            tool.capabilities.push(value.to_string());
        } else if let Some(value) = tag_value(trimmed, "@boundary ") {
            tool.boundaries.push(value.to_string());
        } else if let Some(value) = tag_value(trimmed, "@keywords ") {
            tool.keywords.extend(split_keywords(value));
        } else if trimmed.starts_with("@interface") {
            in_interface = true;
        } else if let Some(value) = tag_value(trimmed, "@example ") {
            tool.examples.push(value.to_string());
        } else if !trimmed.is_empty()
            && !trimmed.starts_with(TAG_MARKER)
            && tool.name.is_empty()
            && tool.provides.is_empty()
        {
            description_lines.push(trimmed);
        }
    }

    // The first free line is conventionally the file title; the second is
    // the summary.
    tool.description = match description_lines.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [_, summary, ..] => (*summary).to_string(),
    };

    if tool.name.is_empty() {
        return None;
    }
    Some(tool)
}

/// Return the trimmed value of a tag line that starts with `prefix`.
fn tag_value<'a>(trimmed: &'a str, prefix: &str) -> Option<&'a str> {
    trimmed.strip_prefix(prefix).map(str::trim)
}

/// Split a keyword list on runs of commas and whitespace.
fn split_keywords(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
}

/// Parse an interface line of the form `--name: type[, required][, default=V] [- description]`.
///
/// Lines that do not start with `--name:` followed by a value are dropped.
pub fn parse_interface_line(line: &str) -> Option<Arg> {
    let line = line.trim();
    let after_prefix = line.strip_prefix(FLAG_PREFIX)?;
    let name_len = after_prefix
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(after_prefix.len());
    if name_len == 0 {
        return None;
    }
    let name = &line[..FLAG_PREFIX.len() + name_len];
    let rest = after_prefix[name_len..].strip_prefix(':')?.trim_start();
    if rest.is_empty() {
        return None;
    }

    let (spec, description) = match rest.split_once(DESCRIPTION_SEPARATOR) {
        Some((spec, description)) => (spec, description.trim()),
        None => (rest, ""),
    };

    let mut parts = spec.split(',').map(str::trim);
    let kind = parts.next().unwrap_or(DEFAULT_ARG_TYPE).to_string();
    let mut required = false;
    let mut default = None;
    for part in parts {
        if part == "required" {
            required = true;
        } else if let Some(value) = part.strip_prefix("default=") {
            default = Some(value.to_string());
        }
    }

    Some(Arg {
        name: name.to_string(),
        kind,
        required,
        default,
        description: description.to_string(),
    })
}

/// Render a tool descriptor as a tag block that [`parse_tags`] reads back.
///
/// `title` becomes the first free line (conventionally the file name), and
/// the description follows it. A tool without a description gets no title
/// either, since a lone free line would read back as the description.
pub fn render_tags(tool: &Tool, title: &str) -> String {
    let mut lines = Vec::new();
    if !tool.description.is_empty() {
        lines.push(title.to_string());
        lines.push(tool.description.clone());
        lines.push(String::new());
    }

    lines.push(format!("@tool {}", tool.name));
    if let Some(version) = &tool.version {
        lines.push(format!("@version {version}"));
    }
    if !tool.provides.is_empty() {
        lines.push(format!("@provides {}", tool.provides.join(" ")));
    }
    if !tool.requires.is_empty() {
        lines.push(format!("@requires {}", tool.requires.join(" ")));
    }
    if let Some(output) = &tool.output {
        lines.push(format!("@output {output}"));
    }
    lines.push(format!("@freshness {}", tool.freshness));

    push_section(&mut lines, "@capability", &tool.capabilities);
    push_section(&mut lines, "@boundary", &tool.boundaries);

    if !tool.keywords.is_empty() {
        lines.push(String::new());
        lines.push(format!("@keywords {}", tool.keywords.join(", ")));
    }

    if !tool.interface.is_empty() {
        lines.push(String::new());
        lines.push("@interface".to_string());
        lines.extend(render_interface(&tool.interface));
    }

    push_section(&mut lines, "@example", &tool.examples);

    let mut block = lines.join("\n");
    block.push('\n');
    block
}

/// Append a blank line and one tag line per entry, if there are entries.
fn push_section(lines: &mut Vec<String>, tag: &str, entries: &[String]) {
    if entries.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.extend(entries.iter().map(|entry| format!("{tag} {entry}")));
}

/// Render interface arguments as indented `--name: spec - description` lines.
fn render_interface(interface: &BTreeMap<String, Arg>) -> impl Iterator<Item = String> + '_ {
    interface.values().map(|arg| {
        let mut line = format!("  {}: {}", arg.name, arg.kind);
        if arg.required {
            line.push_str(", required");
        }
        if let Some(default) = &arg.default {
            line.push_str(&format!(", default={default}"));
        }
        if !arg.description.is_empty() {
            line.push_str(DESCRIPTION_SEPARATOR);
            line.push_str(&arg.description);
        }
        line
    })
}
