//! Built-in option trees and icons for every component.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! These baselines are versioned with the crate. Users can override any value
//! through the `default` variant, but cannot change their structure.

use forms_config::{ConfigNode, IconGenerator};
use once_cell::sync::Lazy;

use crate::component::ComponentKind;

/// Design tokens shared by the built-in defaults.
pub mod colors {
    pub const WHITE: &str = "#fff";
    pub const GRAY_300: &str = "#e2e8f0";
    pub const GRAY_500: &str = "#a0aec0";
    pub const BLUE_400: &str = "#63b3ed";
    pub const BLUE_500: &str = "#4299e1";
}

const BORDER_WIDTH: &str = "1px";
const BORDER_RADIUS: &str = "0.25rem";
const SPACING_2: &str = "0.5rem";
const SPACING_3: &str = "0.75rem";
const SPACING_10: &str = "2.5rem";
const FONT_SIZE_BASE: &str = "1rem";
const LINE_HEIGHT_NORMAL: &str = "1.5";
const SHADOW_OUTLINE: &str = "0 0 0 3px rgba(66, 153, 225, 0.5)";

pub(crate) static SELECT_ICON: Lazy<IconGenerator> = Lazy::new(|| {
    IconGenerator::from_fn("select-chevron", |color| {
        Ok(format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="{color}"><path d="M15.3 9.3a1 1 0 0 1 1.4 1.4l-4 4a1 1 0 0 1-1.4 0l-4-4a1 1 0 0 1 1.4-1.4l3.3 3.29 3.3-3.3z"/></svg>"#
        ))
    })
});

pub(crate) static CHECKBOX_ICON: Lazy<IconGenerator> = Lazy::new(|| {
    IconGenerator::from_fn("checkbox-checkmark", |color| {
        Ok(format!(
            r#"<svg viewBox="0 0 16 16" fill="{color}" xmlns="http://www.w3.org/2000/svg"><path d="M5.707 7.293a1 1 0 0 0-1.414 1.414l2 2a1 1 0 0 0 1.414 0l4-4a1 1 0 0 0-1.414-1.414L7 8.586 5.707 7.293z"/></svg>"#
        ))
    })
});

pub(crate) static RADIO_ICON: Lazy<IconGenerator> = Lazy::new(|| {
    IconGenerator::from_fn("radio-dot", |color| {
        Ok(format!(
            r#"<svg viewBox="0 0 16 16" fill="{color}" xmlns="http://www.w3.org/2000/svg"><circle cx="8" cy="8" r="3"/></svg>"#
        ))
    })
});

fn text(value: &str) -> ConfigNode {
    ConfigNode::string(value)
}

fn focus_ring() -> ConfigNode {
    ConfigNode::branch([
        ("outline", text("none")),
        ("boxShadow", text(SHADOW_OUTLINE)),
        ("borderColor", text(colors::BLUE_400)),
    ])
}

/// Border, background and typography shared by the text-like controls.
fn text_control() -> Vec<(&'static str, ConfigNode)> {
    vec![
        ("backgroundColor", text(colors::WHITE)),
        ("borderColor", text(colors::GRAY_300)),
        ("borderWidth", text(BORDER_WIDTH)),
        ("borderRadius", text(BORDER_RADIUS)),
        ("paddingTop", text(SPACING_2)),
        ("paddingRight", text(SPACING_3)),
        ("paddingBottom", text(SPACING_2)),
        ("paddingLeft", text(SPACING_3)),
        ("fontSize", text(FONT_SIZE_BASE)),
        ("lineHeight", text(LINE_HEIGHT_NORMAL)),
    ]
}

fn checkable(border_radius: &str, icon: &IconGenerator) -> ConfigNode {
    ConfigNode::branch([
        ("display", text("inline-block")),
        ("verticalAlign", text("middle")),
        ("backgroundOrigin", text("border-box")),
        ("userSelect", text("none")),
        ("flexShrink", ConfigNode::from(0_i64)),
        ("height", text("1em")),
        ("width", text("1em")),
        ("color", text(colors::BLUE_500)),
        ("backgroundColor", text(colors::WHITE)),
        ("borderColor", text(colors::GRAY_300)),
        ("borderWidth", text(BORDER_WIDTH)),
        ("borderRadius", text(border_radius)),
        ("focus", focus_ring()),
        (
            "checked",
            ConfigNode::branch([
                ("borderColor", text("transparent")),
                ("backgroundColor", text("currentColor")),
                ("backgroundSize", text("100% 100%")),
                ("backgroundPosition", text("center")),
                ("backgroundRepeat", text("no-repeat")),
                ("iconColor", text(colors::WHITE)),
                ("icon", ConfigNode::Generator(icon.clone())),
            ]),
        ),
    ])
}

/// The built-in option tree for `kind`.
///
/// State sub-trees (`hover`, `focus`, `placeholder`, `checked`) are only
/// present where the baseline sets something in them.
pub fn builtin_defaults(kind: ComponentKind) -> ConfigNode {
    match kind {
        ComponentKind::Input | ComponentKind::Textarea => {
            let mut entries = text_control();
            entries.push((
                "placeholder",
                ConfigNode::branch([
                    ("color", text(colors::GRAY_500)),
                    ("opacity", text("1")),
                ]),
            ));
            entries.push(("focus", focus_ring()));
            ConfigNode::branch(entries)
        }
        ComponentKind::Multiselect => {
            let mut entries = text_control();
            entries.push(("focus", focus_ring()));
            ConfigNode::branch(entries)
        }
        ComponentKind::Select => {
            let mut entries = text_control();
            for (key, value) in entries.iter_mut() {
                if *key == "paddingRight" {
                    *value = text(SPACING_10);
                }
            }
            entries.extend([
                ("backgroundRepeat", text("no-repeat")),
                ("backgroundPosition", text("right 0.5rem center")),
                ("backgroundSize", text("1.5em 1.5em")),
                ("iconColor", text(colors::GRAY_500)),
                ("icon", ConfigNode::Generator(SELECT_ICON.clone())),
                ("focus", focus_ring()),
            ]);
            ConfigNode::branch(entries)
        }
        ComponentKind::Checkbox => checkable(BORDER_RADIUS, &CHECKBOX_ICON),
        ComponentKind::Radio => checkable("100%", &RADIO_ICON),
    }
}
