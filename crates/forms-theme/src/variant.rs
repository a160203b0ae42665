//! Per-variant resolution of a user theme.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A user theme maps variant names to per-component overrides. Every
//! component of every variant goes through the same linear pipeline:
//!
//! ```text
//! raw override -> expanded -> merged with built-in defaults (default variant only)
//!              -> icon-substituted -> emitted or skipped
//! ```
//!
//! Non-default variants carry only their own overrides and are rendered with a
//! `-{name}` selector suffix, so a `.form-radio-sm` rule only restates what the
//! `sm` variant changes.
//!
//! Each variant × component pair is its own failure domain: a broken pair is
//! reported as a [`Diagnostic`] and left out, the rest still resolve.

use forms_config::{ConfigNode, MergeOptions, ThemeLookup, merge, validate_depth};
use tracing::{debug, trace, warn};

use crate::component::ComponentKind;
use crate::defaults::builtin_defaults;
use crate::diagnostic::Diagnostic;
use crate::encode::IconEncoder;
use crate::error::FormsError;
use crate::expand::expand_collecting;
use crate::icons::IconSubstitution;
use crate::rule::ComponentRule;

/// Name of the variant merged with the built-in defaults.
pub const DEFAULT_VARIANT: &str = "default";

/// Diagnostic code for component labels that name no known component.
const UNKNOWN_COMPONENT: &str = "F-1-3";

/// Diagnostic code for icons dropped in favour of an explicit `backgroundImage`.
const SHADOWED_ICON: &str = "F-2-2";

const GROUP_KEY_HINT: &str = "Group keys must be component names separated by \", \"?";

/// Rules produced from a theme, plus everything that went wrong on the way.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Emitted rules: default variant first, then the theme's variants in
    /// declaration order; within a variant, components in
    /// [`ComponentKind::all`] order.
    pub rules: Vec<ComponentRule>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn selectors(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.selector.as_str()).collect()
    }

    pub fn rule(&self, selector: &str) -> Option<&ComponentRule> {
        self.rules.iter().find(|rule| rule.selector == selector)
    }

    /// Rules for one variant, in emission order.
    pub fn variant<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ComponentRule> + 'a {
        self.rules.iter().filter(move |rule| rule.variant == name)
    }

    pub fn rules_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.rules.iter().map(ComponentRule::to_json).collect())
    }
}

/// Resolves user themes into component rules.
pub struct VariantResolver {
    substitution: IconSubstitution,
    merge_options: MergeOptions,
}

impl Default for VariantResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl VariantResolver {
    /// Resolver with the built-in icons and the SVG data-URI encoder.
    pub fn new() -> Self {
        Self {
            substitution: IconSubstitution::default(),
            merge_options: MergeOptions::default(),
        }
    }

    pub fn with_encoder(self, encoder: impl IconEncoder + 'static) -> Self {
        self.with_substitution(IconSubstitution::new(encoder))
    }

    pub fn with_substitution(mut self, substitution: IconSubstitution) -> Self {
        self.substitution = substitution;
        self
    }

    pub fn with_merge_options(mut self, options: MergeOptions) -> Self {
        self.merge_options = options;
        self
    }

    /// Resolve the theme found at `path` in a host theme.
    ///
    /// A missing theme resolves like an empty one: the default variant with
    /// built-in defaults only. Variants follow in the order of
    /// [`ThemeLookup::keys`].
    pub fn resolve_lookup(&self, lookup: &ThemeLookup, path: &str) -> Resolution {
        let mut resolution = Resolution::default();

        let theme = lookup.theme(path, ConfigNode::empty());
        let variants = match &theme {
            ConfigNode::Branch(map) => map,
            _ => {
                let err = FormsError::malformed(&[], "theme must map variant names to overrides");
                warn!(error = %err, "theme is not a mapping");
                resolution
                    .diagnostics
                    .push(Diagnostic::from_error(&err, DEFAULT_VARIANT, None));
                return resolution;
            }
        };

        let empty = ConfigNode::empty();
        let default_overrides = variants.get(DEFAULT_VARIANT).unwrap_or(&empty);
        self.resolve_variant_into(DEFAULT_VARIANT, default_overrides, &mut resolution);

        for name in lookup.keys(path) {
            if name != DEFAULT_VARIANT {
                let overrides = variants.get(&name).unwrap_or(&empty);
                self.resolve_variant_into(&name, overrides, &mut resolution);
            }
        }

        debug!(
            rules = resolution.rules.len(),
            diagnostics = resolution.diagnostics.len(),
            "theme resolved"
        );
        resolution
    }

    /// Resolve every variant of `theme`.
    ///
    /// The default variant is always resolved, even when the theme does not
    /// mention it.
    pub fn resolve(&self, theme: &ConfigNode) -> Resolution {
        self.resolve_lookup(&ThemeLookup::new(theme.clone()), "")
    }

    /// Resolve a single variant's overrides.
    ///
    /// Only the `default` variant is merged with the built-in defaults.
    pub fn resolve_variant(&self, name: &str, overrides: &ConfigNode) -> Resolution {
        let mut resolution = Resolution::default();
        self.resolve_variant_into(name, overrides, &mut resolution);
        resolution
    }

    fn resolve_variant_into(&self, name: &str, overrides: &ConfigNode, out: &mut Resolution) {
        let mut errors = Vec::new();
        let expanded = match expand_collecting(overrides, &mut errors) {
            Ok(expanded) => expanded,
            Err(err) => {
                report(err, name, None, out);
                return;
            }
        };
        for err in errors {
            warn!(variant = name, error = %err, "skipping malformed group key");
            out.diagnostics
                .push(Diagnostic::from_error(&err, name, None).add_hint(GROUP_KEY_HINT));
        }

        for label in expanded.as_branch().into_iter().flat_map(|map| map.keys()) {
            if label.parse::<ComponentKind>().is_err() {
                warn!(variant = name, label = %label, "ignoring unknown component");
                out.diagnostics.push(
                    Diagnostic::warning("Unknown component")
                        .with_code(UNKNOWN_COMPONENT)
                        .problem(format!("`{}` is not a form component", label))
                        .for_variant(name)
                        .add_hint(format!(
                            "Known components are: {}",
                            ComponentKind::all()
                                .iter()
                                .map(ComponentKind::name)
                                .collect::<Vec<_>>()
                                .join(", ")
                        )),
                );
            }
        }

        for kind in ComponentKind::all() {
            let mut shadowed = Vec::new();
            match self.resolve_component(name, *kind, expanded.get(kind.name()), &mut shadowed) {
                Ok(Some(rule)) => out.rules.push(rule),
                Ok(None) => {}
                Err(err) => report(err, name, Some(*kind), out),
            }
            for path in shadowed {
                out.diagnostics.push(
                    Diagnostic::warning("Icon ignored")
                        .with_code(SHADOWED_ICON)
                        .problem("`icon`/`iconColor` dropped in favour of an explicit `backgroundImage`")
                        .for_variant(name)
                        .for_component(*kind)
                        .add_detail(format!("at `{}`", path))
                        .add_hint("Remove `backgroundImage` to use the icon"),
                );
            }
        }
    }

    fn resolve_component(
        &self,
        variant: &str,
        kind: ComponentKind,
        overrides: Option<&ConfigNode>,
        shadowed: &mut Vec<String>,
    ) -> Result<Option<ComponentRule>, FormsError> {
        let overrides = match overrides {
            None | Some(ConfigNode::Erased) => ConfigNode::empty(),
            Some(node @ ConfigNode::Branch(_)) => node.clone(),
            Some(_) => {
                return Err(FormsError::malformed(
                    &[variant, kind.name()],
                    "component overrides must be a mapping",
                ));
            }
        };
        validate_depth(&overrides, &self.merge_options)?;

        let merged = if variant == DEFAULT_VARIANT {
            merge(&[&builtin_defaults(kind), &overrides])
        } else {
            overrides
        };
        if merged.is_empty() {
            trace!(variant, component = %kind, "no options, skipping rule");
            return Ok(None);
        }

        let (options, dropped) = self.substitution.apply_reporting(&merged, kind)?;
        let rule = ComponentRule::build(variant, kind, merged, options)?;
        shadowed.extend(dropped);
        if rule.styles.is_empty() {
            trace!(variant, component = %kind, "only erased options, skipping rule");
            return Ok(None);
        }

        debug!(variant, component = %kind, selector = %rule.selector, "resolved component rule");
        Ok(Some(rule))
    }
}

fn report(err: FormsError, variant: &str, component: Option<ComponentKind>, out: &mut Resolution) {
    match component {
        Some(kind) => warn!(variant, component = %kind, error = %err, "excluding component rule"),
        None => warn!(variant, error = %err, "excluding variant entry"),
    }
    out.diagnostics
        .push(Diagnostic::from_error(&err, variant, component));
}
