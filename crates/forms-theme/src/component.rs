//! The fixed set of form components the resolver knows about.
//!
//! Copyright (c) 2025 Posit, PBC

use std::fmt;
use std::str::FromStr;

use forms_config::IconGenerator;
use serde::{Deserialize, Serialize};

use crate::defaults;

/// A form element category.
///
/// Declaration order is the emission order of component rules within a
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Input,
    Textarea,
    Multiselect,
    Select,
    Checkbox,
    Radio,
}

impl ComponentKind {
    /// Get the component name as used in theme keys and selectors.
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Input => "input",
            ComponentKind::Textarea => "textarea",
            ComponentKind::Multiselect => "multiselect",
            ComponentKind::Select => "select",
            ComponentKind::Checkbox => "checkbox",
            ComponentKind::Radio => "radio",
        }
    }

    /// Get all components in emission order.
    pub fn all() -> &'static [ComponentKind] {
        &[
            ComponentKind::Input,
            ComponentKind::Textarea,
            ComponentKind::Multiselect,
            ComponentKind::Select,
            ComponentKind::Checkbox,
            ComponentKind::Radio,
        ]
    }

    /// Whether the component has a `placeholder` state sub-tree.
    pub fn has_placeholder(&self) -> bool {
        matches!(self, ComponentKind::Input | ComponentKind::Textarea)
    }

    /// Whether the component has a `checked` state sub-tree.
    pub fn is_checkable(&self) -> bool {
        matches!(self, ComponentKind::Checkbox | ComponentKind::Radio)
    }

    /// Whether the component draws an icon.
    pub fn supports_icon(&self) -> bool {
        self.default_icon().is_some()
    }

    /// The built-in icon generator (chevron, checkmark or dot).
    pub fn default_icon(&self) -> Option<IconGenerator> {
        match self {
            ComponentKind::Select => Some(defaults::SELECT_ICON.clone()),
            ComponentKind::Checkbox => Some(defaults::CHECKBOX_ICON.clone()),
            ComponentKind::Radio => Some(defaults::RADIO_ICON.clone()),
            _ => None,
        }
    }

    /// Color used for the icon when no `iconColor` is given.
    pub fn default_icon_color(&self) -> Option<&'static str> {
        match self {
            ComponentKind::Select => Some(defaults::colors::GRAY_500),
            ComponentKind::Checkbox | ComponentKind::Radio => Some(defaults::colors::WHITE),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown component '{}'", s))
    }
}
