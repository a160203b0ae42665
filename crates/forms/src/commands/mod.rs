//! Command implementations for the forms CLI
//!
//! Each command module handles the CLI interface and delegates to
//! forms-theme for the actual resolution.

pub mod defaults;
pub mod resolve;

use clap::ValueEnum;
use forms_config::ConfigNode;

/// How trees are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Indented outline, one property per line
    Text,
}

/// Render `node` as an indented outline under `heading`.
pub fn render_text(heading: &str, node: &ConfigNode) -> String {
    let mut out = String::from(heading);
    write_outline(node, 1, &mut out);
    out
}

fn write_outline(node: &ConfigNode, depth: usize, out: &mut String) {
    let Some(map) = node.as_branch() else {
        return;
    };
    let indent = "  ".repeat(depth);
    for (key, value) in map {
        match value {
            ConfigNode::Branch(_) => {
                out.push_str(&format!("\n{}{}", indent, key));
                write_outline(value, depth + 1, out);
            }
            ConfigNode::Erased => out.push_str(&format!("\n{}{}: ~", indent, key)),
            ConfigNode::Generator(generator) => {
                out.push_str(&format!("\n{}{}: <{}>", indent, key, generator.name()))
            }
            ConfigNode::Scalar(_) => {
                let text = value.scalar_text().unwrap_or_default();
                out.push_str(&format!("\n{}{}: {}", indent, key, text));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text() {
        let node = ConfigNode::branch([
            ("color", ConfigNode::from("red")),
            ("flexShrink", ConfigNode::from(0_i64)),
            (
                "&:hover",
                ConfigNode::branch([("outline", ConfigNode::Erased)]),
            ),
        ]);

        assert_eq!(
            render_text(".form-input", &node),
            ".form-input\n  color: red\n  flexShrink: 0\n  &:hover\n    outline: ~"
        );
    }
}
