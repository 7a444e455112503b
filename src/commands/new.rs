//! Implementation of the `tctl new` command.

use std::{
    fs,
    path::{Path, PathBuf},
};

use minijinja::{Environment, UndefinedBehavior, context};

use crate::{
    error::{Error, Result},
    paths::display_path,
    tags::render_tags,
    tool::{Arg, Tool},
};

/// Python tool skeleton; `tags` is the rendered tag block.
const PYTHON_TEMPLATE: &str = r#"#!/usr/bin/env python3
"""
{{ tags }}"""

import argparse


def main():
    parser = argparse.ArgumentParser(description="{{ name }}")
    parser.add_argument("--out", required=True, help="Output file path")
    args = parser.parse_args()

    print(f"{{ name }}: writing {args.out}")


if __name__ == "__main__":
    main()
"#;

/// Execute the new command.
pub async fn run(name: String, output: PathBuf) -> Result<()> {
    let path = create_tool(&name, &output)?;
    println!("✓ Created: {}", display_path(&path));
    println!();
    println!("Next steps:");
    println!("  1. Edit {} and fill in the tags", display_path(&path));
    println!("  2. Register the directory: tctl add {}", display_path(&output));
    println!("  3. Check it: tctl lint {}", display_path(&path));
    println!("  4. Run it: tctl run {name} --help");
    Ok(())
}

/// Write a new tool file into `dir`, refusing to overwrite.
fn create_tool(name: &str, dir: &Path) -> Result<PathBuf> {
    let file_name = file_name_for(name);
    let path = dir.join(&file_name);
    if path.exists() {
        return Err(Error::PathExists { path });
    }

    let contents = render_tool(name, &file_name)?;
    fs::create_dir_all(dir).map_err(|error| Error::ToolWrite {
        path: dir.to_path_buf(),
        source: error,
    })?;
    fs::write(&path, contents).map_err(|error| Error::ToolWrite {
        path: path.clone(),
        source: error,
    })?;
    make_executable(&path)?;
    Ok(path)
}

/// File name for a tool: hyphens become underscores.
fn file_name_for(name: &str) -> String {
    format!("{}.py", name.replace('-', "_"))
}

/// Placeholder descriptor written into new tools.
fn skeleton(name: &str, file_name: &str) -> Tool {
    let stem = file_name.trim_end_matches(".py");
    let mut tool = Tool {
        name: name.to_string(),
        version: Some("0.1.0".to_string()),
        description: "<one-line description of what this tool does>".to_string(),
        provides: vec![name.to_string()],
        output: Some(format!("data/{stem}.csv")),
        freshness: "daily".to_string(),
        capabilities: vec!["<describe what this tool does>".to_string()],
        boundaries: vec!["<describe what this tool does not do>".to_string()],
        keywords: name
            .split('-')
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        examples: vec![format!("tctl run {name} --out data/{stem}.csv")],
        ..Tool::default()
    };
    tool.interface.insert(
        "--out".to_string(),
        Arg {
            name: "--out".to_string(),
            kind: "file".to_string(),
            required: true,
            default: None,
            description: "Output file path".to_string(),
        },
    );
    tool
}

/// Render the tool source for `name`.
fn render_tool(name: &str, file_name: &str) -> Result<String> {
    let tags = render_tags(&skeleton(name, file_name), file_name);
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    let template = env
        .template_from_str(PYTHON_TEMPLATE)
        .map_err(|error| Error::TemplateRender {
            message: error.to_string(),
        })?;
    template
        .render(context! { name => name, tags => tags })
        .map_err(|error| Error::TemplateRender {
            message: error.to_string(),
        })
}

/// Mark a generated script executable.
#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|error| {
        Error::ToolWrite {
            path: path.to_path_buf(),
            source: error,
        }
    })
}

/// Mark a generated script executable.
#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
