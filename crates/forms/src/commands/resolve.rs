//! Resolve command implementation.
//!
//! Reads a YAML theme, resolves every variant and prints the component rules
//! on stdout. Diagnostics go to stderr; the command fails when any rule had
//! to be left out.

use std::fs;

use anyhow::{Context, Result};
use tracing::{debug, info};

use forms_config::{ConfigNode, ThemeLookup, parse_file};
use forms_theme::{VariantResolver, base_utilities};

use super::{OutputFormat, render_text};

/// Arguments for the resolve command
#[derive(Debug)]
pub struct ResolveArgs {
    /// Theme file
    pub file: String,
    pub format: OutputFormat,
    /// Resolve only this variant
    pub variant: Option<String>,
    /// Dotted path of the theme inside the file
    pub theme_path: String,
    /// Include the per-component reset rules
    pub base: bool,
}

/// Execute the resolve command
pub fn execute(args: ResolveArgs) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read theme file: {}", args.file))?;
    let tree = parse_file(&content, &args.file)
        .with_context(|| format!("Failed to load theme: {}", args.file))?;
    debug!(file = %args.file, "theme loaded");

    let lookup = ThemeLookup::new(tree);
    let resolver = VariantResolver::new();
    let resolution = match &args.variant {
        Some(variant) => {
            if !lookup.keys(&args.theme_path).contains(variant) {
                info!(variant = %variant, "variant not declared in theme");
            }
            let overrides = lookup
                .theme(&args.theme_path, ConfigNode::empty())
                .get(variant)
                .cloned()
                .unwrap_or_else(ConfigNode::empty);
            resolver.resolve_variant(variant, &overrides)
        }
        None => resolver.resolve_lookup(&lookup, &args.theme_path),
    };

    for diagnostic in &resolution.diagnostics {
        eprintln!("{}\n", diagnostic.to_text());
    }

    let rules = &resolution.rules;
    if rules.is_empty() {
        info!("no rules resolved");
    }

    let base = if args.base { base_utilities() } else { Vec::new() };

    match args.format {
        OutputFormat::Json => {
            let mut output: Vec<serde_json::Value> = base
                .iter()
                .map(|(selector, styles)| {
                    serde_json::json!({ "selector": selector, "styles": styles.to_json() })
                })
                .collect();
            output.extend(rules.iter().map(|rule| rule.to_json()));
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            let blocks: Vec<String> = base
                .iter()
                .map(|(selector, styles)| render_text(selector, styles))
                .chain(rules.iter().map(|rule| render_text(&rule.selector, &rule.styles)))
                .collect();
            println!("{}", blocks.join("\n\n"));
        }
    }

    let errors = resolution.diagnostics.iter().filter(|d| d.is_error()).count();
    if errors > 0 {
        anyhow::bail!("{} component rule(s) could not be resolved", errors);
    }
    Ok(())
}
