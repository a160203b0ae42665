//! Icon substitution.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Components that draw an icon (select chevron, checkbox checkmark, radio
//! dot) describe it declaratively with an `icon`/`iconColor` pair. This pass
//! walks a resolved option tree depth-first and, at every branch carrying
//! either key, replaces the pair with a single `backgroundImage` value:
//!
//! ```text
//! color  = iconColor ?? default color for the component
//! markup = icon(color)         when icon is a generator
//!        | icon                when icon is literal markup
//!        | default icon(color) when icon is absent
//! backgroundImage = url("<encoded markup>")
//! ```
//!
//! Sibling keys are kept. A branch whose `icon` was explicitly erased gets an
//! erased `backgroundImage`. A branch that already sets `backgroundImage`
//! itself keeps that value. Running the pass on its own output is a no-op,
//! since no `icon`/`iconColor` keys remain.

use forms_config::{ConfigNode, IconGenerator, IndexMap};
use tracing::debug;

use crate::component::ComponentKind;
use crate::encode::{IconEncoder, SvgDataUri};
use crate::error::FormsError;

const ICON: &str = "icon";
const ICON_COLOR: &str = "iconColor";
const BACKGROUND_IMAGE: &str = "backgroundImage";

type DefaultIcons = dyn Fn(ComponentKind) -> Option<IconGenerator> + Send + Sync;

/// Replaces `icon`/`iconColor` pairs with encoded background images.
pub struct IconSubstitution {
    encoder: Box<dyn IconEncoder>,
    default_icons: Box<DefaultIcons>,
}

impl Default for IconSubstitution {
    fn default() -> Self {
        Self::new(SvgDataUri)
    }
}

impl IconSubstitution {
    /// Substitution using the built-in default icons and `encoder`.
    pub fn new(encoder: impl IconEncoder + 'static) -> Self {
        Self {
            encoder: Box::new(encoder),
            default_icons: Box::new(|kind: ComponentKind| kind.default_icon()),
        }
    }

    /// Replace the per-component default icon lookup.
    pub fn with_default_icons<F>(mut self, default_icons: F) -> Self
    where
        F: Fn(ComponentKind) -> Option<IconGenerator> + Send + Sync + 'static,
    {
        self.default_icons = Box::new(default_icons);
        self
    }

    /// Substitute icons everywhere in `tree`, which belongs to `kind`.
    ///
    /// Returns a new tree; `tree` itself is not modified.
    pub fn apply(&self, tree: &ConfigNode, kind: ComponentKind) -> Result<ConfigNode, FormsError> {
        self.apply_at(tree, kind, &mut Vec::new(), &mut Vec::new())
    }

    /// Like [`apply`](Self::apply), also returning the paths of branches whose
    /// `icon`/`iconColor` were dropped in favour of an explicit
    /// `backgroundImage`.
    pub fn apply_reporting(
        &self,
        tree: &ConfigNode,
        kind: ComponentKind,
    ) -> Result<(ConfigNode, Vec<String>), FormsError> {
        let mut shadowed = Vec::new();
        let substituted = self.apply_at(tree, kind, &mut Vec::new(), &mut shadowed)?;
        Ok((substituted, shadowed))
    }

    fn apply_at(
        &self,
        node: &ConfigNode,
        kind: ComponentKind,
        path: &mut Vec<String>,
        shadowed: &mut Vec<String>,
    ) -> Result<ConfigNode, FormsError> {
        let ConfigNode::Branch(map) = node else {
            return Ok(node.clone());
        };

        let mut children: IndexMap<String, ConfigNode> = IndexMap::with_capacity(map.len());
        for (key, child) in map {
            path.push(key.clone());
            let substituted = self.apply_at(child, kind, path, shadowed)?;
            path.pop();
            children.insert(key.clone(), substituted);
        }

        if !children.contains_key(ICON) && !children.contains_key(ICON_COLOR) {
            return Ok(ConfigNode::Branch(children));
        }

        let mut image = if children.contains_key(BACKGROUND_IMAGE) {
            let at = path.join(".");
            debug!(component = %kind, path = %at, "explicit backgroundImage kept over icon");
            shadowed.push(at);
            None
        } else {
            Some(self.background_image(&children, kind, path)?)
        };

        // The image takes the slot of the first icon key
        let mut result = IndexMap::with_capacity(children.len());
        for (key, value) in children {
            if key == ICON || key == ICON_COLOR {
                if let Some(image) = image.take() {
                    result.insert(BACKGROUND_IMAGE.to_string(), image);
                }
            } else {
                result.insert(key, value);
            }
        }
        Ok(ConfigNode::Branch(result))
    }

    fn background_image(
        &self,
        branch: &IndexMap<String, ConfigNode>,
        kind: ComponentKind,
        path: &[String],
    ) -> Result<ConfigNode, FormsError> {
        let icon_error = |message: String| FormsError::IconResolution {
            kind,
            path: path.to_vec(),
            message,
        };

        let markup = match branch.get(ICON) {
            Some(ConfigNode::Erased) => return Ok(ConfigNode::Erased),
            Some(node @ ConfigNode::Scalar(_)) => node
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| icon_error("`icon` must be markup or a generator".to_string()))?,
            Some(ConfigNode::Generator(generator)) => {
                let color = icon_color(branch, kind).map_err(icon_error)?;
                generator
                    .generate(&color)
                    .map_err(|err| icon_error(err.to_string()))?
            }
            Some(ConfigNode::Branch(_)) => {
                return Err(icon_error(
                    "`icon` must be markup or a generator, not a mapping".to_string(),
                ));
            }
            None => {
                let generator = (self.default_icons)(kind)
                    .ok_or_else(|| icon_error(format!("`{}` has no default icon", kind)))?;
                let color = icon_color(branch, kind).map_err(icon_error)?;
                generator
                    .generate(&color)
                    .map_err(|err| icon_error(err.to_string()))?
            }
        };

        let uri = self.encoder.encode(&markup)?;
        Ok(ConfigNode::string(format!("url(\"{}\")", uri)))
    }
}

/// The color to draw the icon with.
///
/// An erased `iconColor` falls back to the component default like an absent
/// one.
fn icon_color(branch: &IndexMap<String, ConfigNode>, kind: ComponentKind) -> Result<String, String> {
    match branch.get(ICON_COLOR) {
        Some(ConfigNode::Erased) | None => kind
            .default_icon_color()
            .map(str::to_string)
            .ok_or_else(|| format!("no `iconColor` given and `{}` has no default", kind)),
        Some(node) => node
            .scalar_text()
            .ok_or_else(|| "`iconColor` must be a color value".to_string()),
    }
}
