//! Color palette and styling for CLI output.
//!
//! This module defines a consistent visual style for all CLI output.
//! Colors are designed for modern terminals with full color support.

use owo_colors::{OwoColorize, Style};

use crate::freshness::Freshness;

/// Style for tool names - the primary identifier, visually prominent.
pub fn tool_name() -> Style {
    Style::new().cyan().bold()
}

/// Style for section headings like "DATA AVAILABLE:".
pub fn heading() -> Style {
    Style::new().white().bold()
}

/// Style for labels like "provides:" or "output:".
pub fn label() -> Style {
    Style::new().blue()
}

/// Style for description text - readable but subdued.
pub fn description() -> Style {
    Style::new().dimmed()
}

/// Style for path values.
pub fn path() -> Style {
    Style::new().white()
}

/// Style for fresh outputs and present sources.
pub fn status_ok() -> Style {
    Style::new().green()
}

/// Style for stale outputs.
pub fn status_stale() -> Style {
    Style::new().yellow()
}

/// Style for missing outputs and sources.
pub fn status_error() -> Style {
    Style::new().red()
}

/// Apply `style` when color is enabled.
fn paint(text: &str, style: Style, use_color: bool) -> String {
    if use_color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Format a tool name with styling.
pub fn fmt_tool_name(name: &str, use_color: bool) -> String {
    paint(name, tool_name(), use_color)
}

/// Format a section heading with styling.
pub fn fmt_heading(text: &str, use_color: bool) -> String {
    paint(text, heading(), use_color)
}

/// Format a label with styling.
pub fn fmt_label(text: &str, use_color: bool) -> String {
    paint(text, label(), use_color)
}

/// Format description text with styling.
pub fn fmt_description(text: &str, use_color: bool) -> String {
    paint(text, description(), use_color)
}

/// Format a path with styling.
pub fn fmt_path(text: &str, use_color: bool) -> String {
    paint(text, path(), use_color)
}

/// Format a success marker.
pub fn fmt_ok(text: &str, use_color: bool) -> String {
    paint(text, status_ok(), use_color)
}

/// Format a failure marker.
pub fn fmt_error(text: &str, use_color: bool) -> String {
    paint(text, status_error(), use_color)
}

/// Freshness marker: `✓` fresh, `⚠` stale, `✗` missing or unreadable.
pub fn fmt_freshness(status: &Freshness, use_color: bool) -> String {
    if status.fresh {
        paint("✓", status_ok(), use_color)
    } else if status.is_missing() || status.message.starts_with("error") {
        paint("✗", status_error(), use_color)
    } else {
        paint("⚠", status_stale(), use_color)
    }
}

#[cfg(test)]
mod tests {
    use super::{fmt_freshness, fmt_tool_name};
    use crate::freshness::Freshness;

    #[test]
    fn disables_color_output() {
        assert_eq!(fmt_tool_name("fetch", false), "fetch");
    }

    #[test]
    fn marks_freshness() {
        let status = |fresh: bool, message: &str| Freshness {
            fresh,
            message: message.to_string(),
        };
        assert_eq!(fmt_freshness(&status(true, "fresh (3m ago)"), false), "✓");
        assert_eq!(fmt_freshness(&status(false, "stale (2d ago)"), false), "⚠");
        assert_eq!(fmt_freshness(&status(false, "missing"), false), "✗");
    }
}
