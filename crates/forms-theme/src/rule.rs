//! Component rules handed to the stylesheet emitter.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A resolved option tree mixes plain properties with state sub-trees
//! (`hover`, `focus`, `placeholder`, `checked`). The emitter consumes nested
//! rule objects keyed by selector fragments instead, so [`layout`] lifts every
//! state sub-tree into its `&:state` block:
//!
//! ```text
//! { color: gray, hover: { color: black } }
//!   => { color: gray, "&:hover": { color: black } }
//! ```
//!
//! Absent state sub-trees count as empty; empty blocks and erased properties
//! are left out.

use forms_config::{ConfigNode, IndexMap};
use serde_json::json;

use crate::component::ComponentKind;
use crate::error::FormsError;
use crate::variant::DEFAULT_VARIANT;

const PRINT_HIGH_CONTRAST: &str =
    "@media print and (-ms-high-contrast: active), print and (-ms-high-contrast: none)";
const NOT_PRINT: &str = "@media not print";

type Block = IndexMap<String, ConfigNode>;

/// One resolved variant × component pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRule {
    pub variant: String,
    pub kind: ComponentKind,
    /// `.form-{kind}{modifier}`
    pub selector: String,
    /// Merged tree before icon substitution
    pub merged: ConfigNode,
    /// Merged tree after icon substitution
    pub options: ConfigNode,
    /// `options` laid out as a nested rule object
    pub styles: ConfigNode,
}

impl ComponentRule {
    /// Lay out `options` and assemble the rule.
    pub fn build(
        variant: &str,
        kind: ComponentKind,
        merged: ConfigNode,
        options: ConfigNode,
    ) -> Result<Self, FormsError> {
        let styles = layout(kind, &merged, &options)?;
        Ok(Self {
            variant: variant.to_string(),
            kind,
            selector: selector_for(kind, variant),
            merged,
            options,
            styles,
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "selector": self.selector,
            "variant": self.variant,
            "component": self.kind.name(),
            "styles": self.styles.to_json(),
        })
    }
}

/// Selector suffix for a variant: empty for the default variant.
pub fn modifier_for(variant: &str) -> String {
    if variant == DEFAULT_VARIANT {
        String::new()
    } else {
        format!("-{}", variant)
    }
}

pub fn selector_for(kind: ComponentKind, variant: &str) -> String {
    format!(".form-{}{}", kind.name(), modifier_for(variant))
}

/// Project a resolved option tree onto the nested rule object for `kind`.
///
/// `merged` is the tree before icon substitution; the select's `iconColor`
/// is read from it.
pub fn layout(
    kind: ComponentKind,
    merged: &ConfigNode,
    options: &ConfigNode,
) -> Result<ConfigNode, FormsError> {
    let mut base = match options {
        ConfigNode::Branch(map) => pruned(map),
        ConfigNode::Erased => Block::new(),
        _ => {
            return Err(FormsError::malformed(
                &[kind.name()],
                "component options must be a mapping",
            ));
        }
    };
    let name = kind.name();

    let styles = match kind {
        ComponentKind::Input | ComponentKind::Textarea => {
            let placeholder = take_state(&mut base, &[name], "placeholder")?;
            let mut hover = take_state(&mut base, &[name], "hover")?;
            let hover_placeholder = take_state(&mut hover, &[name, "hover"], "placeholder")?;
            let mut focus = take_state(&mut base, &[name], "focus")?;
            let focus_placeholder = take_state(&mut focus, &[name, "focus"], "placeholder")?;

            let mut out = base;
            nest(&mut out, "&::placeholder", placeholder);
            nest(&mut out, "&:hover", hover);
            nest(&mut out, "&:hover::placeholder", hover_placeholder);
            nest(&mut out, "&:focus", focus);
            nest(&mut out, "&:focus::placeholder", focus_placeholder);
            out
        }
        ComponentKind::Multiselect => {
            let hover = take_state(&mut base, &[name], "hover")?;
            let focus = take_state(&mut base, &[name], "focus")?;

            let mut out = base;
            nest(&mut out, "&:hover", hover);
            nest(&mut out, "&:focus", focus);
            out
        }
        ComponentKind::Select => {
            let hover = take_state(&mut base, &[name], "hover")?;
            let focus = take_state(&mut base, &[name], "focus")?;
            let icon_color = merged
                .get("iconColor")
                .and_then(ConfigNode::scalar_text)
                .map(ConfigNode::string);
            let padding_left = base.get("paddingLeft").cloned();

            let mut out = base;
            if let Some(color) = icon_color {
                nest(&mut out, "&::-ms-expand", block([("color", color)]));
            }
            if let Some(padding) = padding_left {
                nest(&mut out, PRINT_HIGH_CONTRAST, block([("paddingRight", padding)]));
            }
            nest(&mut out, "&:hover", hover);
            nest(&mut out, "&:focus", focus);
            out
        }
        ComponentKind::Checkbox | ComponentKind::Radio => {
            let mut checked = take_state(&mut base, &[name], "checked")?;
            let checked_hover = take_state(&mut checked, &[name, "checked"], "hover")?;
            let checked_focus = take_state(&mut checked, &[name, "checked"], "focus")?;
            let hover = take_state(&mut base, &[name], "hover")?;
            let focus = take_state(&mut base, &[name], "focus")?;
            let border_width = base.get("borderWidth").cloned();

            let mut out = base;
            nest(&mut out, "&:hover", hover);
            nest(&mut out, "&:focus", focus);
            nest(&mut checked, "&:hover", checked_hover);
            nest(&mut checked, "&:focus", checked_focus);
            nest(&mut out, "&:checked", checked);
            if let Some(width) = border_width {
                let media = block([("borderWidth", width)]);
                nest(&mut out, "&::-ms-check", block([(NOT_PRINT, ConfigNode::Branch(media))]));
            }
            out
        }
    };

    Ok(ConfigNode::Branch(styles))
}

/// Reset rules every component needs regardless of theme, one per kind.
pub fn base_utilities() -> Vec<(String, ConfigNode)> {
    ComponentKind::all()
        .iter()
        .map(|kind| {
            let mut entries = vec![("appearance", ConfigNode::string("none"))];
            match kind {
                ComponentKind::Select => {
                    entries.push(("colorAdjust", ConfigNode::string("exact")));
                    entries.push((
                        "&::-ms-expand",
                        ConfigNode::branch([
                            ("border", ConfigNode::string("none")),
                            (
                                NOT_PRINT,
                                ConfigNode::branch([("display", ConfigNode::string("none"))]),
                            ),
                        ]),
                    ));
                }
                ComponentKind::Checkbox | ComponentKind::Radio => {
                    entries.push(("colorAdjust", ConfigNode::string("exact")));
                    entries.push((
                        "&::-ms-check",
                        ConfigNode::branch([(
                            NOT_PRINT,
                            ConfigNode::branch([
                                ("color", ConfigNode::string("transparent")),
                                ("background", ConfigNode::string("inherit")),
                                ("borderColor", ConfigNode::string("inherit")),
                                ("borderRadius", ConfigNode::string("inherit")),
                            ]),
                        )]),
                    ));
                }
                _ => {}
            }
            (selector_for(*kind, DEFAULT_VARIANT), ConfigNode::branch(entries))
        })
        .collect()
}

/// Copy of `map` without erased values or empty branches, at any depth.
fn pruned(map: &Block) -> Block {
    map.iter()
        .filter_map(|(key, value)| match value {
            ConfigNode::Erased => None,
            ConfigNode::Branch(child) => {
                let child = pruned(child);
                (!child.is_empty()).then(|| (key.clone(), ConfigNode::Branch(child)))
            }
            other => Some((key.clone(), other.clone())),
        })
        .collect()
}

/// Remove the state sub-tree `key` from `map`, defaulting to empty.
fn take_state(map: &mut Block, parent: &[&str], key: &str) -> Result<Block, FormsError> {
    match map.shift_remove(key) {
        None => Ok(Block::new()),
        Some(ConfigNode::Branch(state)) => Ok(state),
        Some(_) => {
            let mut path = parent.to_vec();
            path.push(key);
            Err(FormsError::malformed(
                &path,
                format!("`{}` must be a mapping of properties", key),
            ))
        }
    }
}

fn nest(out: &mut Block, selector: &str, contents: Block) {
    if !contents.is_empty() {
        out.insert(selector.to_string(), ConfigNode::Branch(contents));
    }
}

fn block<const N: usize>(entries: [(&str, ConfigNode); N]) -> Block {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
