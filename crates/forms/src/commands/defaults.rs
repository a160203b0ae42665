//! Defaults and kinds command implementations.

use anyhow::Result;

use forms_theme::{ComponentKind, DEFAULT_VARIANT, builtin_defaults, selector_for};

use super::{OutputFormat, render_text};

/// Execute the defaults command
pub fn execute(kind: Option<String>, format: OutputFormat) -> Result<()> {
    let kinds: Vec<ComponentKind> = match kind {
        Some(name) => vec![name.parse::<ComponentKind>().map_err(anyhow::Error::msg)?],
        None => ComponentKind::all().to_vec(),
    };

    match format {
        OutputFormat::Json => {
            let output: serde_json::Map<String, serde_json::Value> = kinds
                .iter()
                .map(|kind| (kind.name().to_string(), builtin_defaults(*kind).to_json()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            let blocks: Vec<String> = kinds
                .iter()
                .map(|kind| render_text(kind.name(), &builtin_defaults(*kind)))
                .collect();
            println!("{}", blocks.join("\n\n"));
        }
    }
    Ok(())
}

/// List the known components with their selector and icon support
pub fn list_kinds() -> Result<()> {
    for kind in ComponentKind::all() {
        let icon = match kind.default_icon_color() {
            Some(color) => format!("icon (default color {})", color),
            None => "no icon".to_string(),
        };
        println!(
            "{:<12} {:<18} {}",
            kind.name(),
            selector_for(*kind, DEFAULT_VARIANT),
            icon
        );
    }
    Ok(())
}
