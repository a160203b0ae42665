//! Core type definitions for style configuration trees.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;
use yaml_rust2::Yaml;

/// Placeholder substituted with the icon color in template generators.
pub const COLOR_PLACEHOLDER: &str = "{color}";

/// A node in a style configuration tree.
///
/// Every pipeline stage pattern-matches on this enum; there is no runtime
/// probing of object shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNode {
    /// Primitive value (string, number, boolean) such as a color or size token.
    Scalar(Yaml),

    /// Ordered mapping from key to child node.
    ///
    /// Insertion order does not affect merging but is preserved so output is
    /// deterministic.
    Branch(IndexMap<String, ConfigNode>),

    /// A function from icon color to markup.
    Generator(IconGenerator),

    /// Key present but undefined.
    ///
    /// In a merge source this requests erasure of the inherited value; in a
    /// merge result it marks a property the emitter must omit.
    Erased,
}

impl ConfigNode {
    /// Create an empty branch.
    pub fn empty() -> Self {
        ConfigNode::Branch(IndexMap::new())
    }

    /// Create a string scalar.
    pub fn string(value: impl Into<String>) -> Self {
        ConfigNode::Scalar(Yaml::String(value.into()))
    }

    /// Create a branch from `(key, node)` pairs, keeping their order.
    pub fn branch<K: Into<String>>(entries: impl IntoIterator<Item = (K, ConfigNode)>) -> Self {
        ConfigNode::Branch(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, ConfigNode::Branch(_))
    }

    pub fn is_erased(&self) -> bool {
        matches!(self, ConfigNode::Erased)
    }

    pub fn is_generator(&self) -> bool {
        matches!(self, ConfigNode::Generator(_))
    }

    /// True for a branch with no keys.
    ///
    /// Leaves are never considered empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, ConfigNode::Branch(map) if map.is_empty())
    }

    pub fn as_branch(&self) -> Option<&IndexMap<String, ConfigNode>> {
        match self {
            ConfigNode::Branch(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_yaml(&self) -> Option<&Yaml> {
        match self {
            ConfigNode::Scalar(yaml) => Some(yaml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_yaml().and_then(|y| y.as_str())
    }

    pub fn as_generator(&self) -> Option<&IconGenerator> {
        match self {
            ConfigNode::Generator(generator) => Some(generator),
            _ => None,
        }
    }

    /// Render a scalar as CSS-ready text.
    ///
    /// Numbers and booleans are printed in their YAML form.
    pub fn scalar_text(&self) -> Option<String> {
        match self.as_yaml()? {
            Yaml::String(s) => Some(s.clone()),
            Yaml::Integer(i) => Some(i.to_string()),
            Yaml::Real(r) => Some(r.clone()),
            Yaml::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Look up a direct child of a branch.
    pub fn get(&self, key: &str) -> Option<&ConfigNode> {
        self.as_branch().and_then(|map| map.get(key))
    }

    /// Navigate through nested branches.
    ///
    /// An empty path returns `self`.
    pub fn get_path(&self, path: &[&str]) -> Option<&ConfigNode> {
        let mut current = self;
        for key in path {
            current = current.get(key)?;
        }
        Some(current)
    }

    /// Project the tree onto JSON.
    ///
    /// Erased values become `null`; generators cannot be represented and are
    /// rendered as a marker string.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            ConfigNode::Scalar(yaml) => match yaml {
                Yaml::String(s) => Value::String(s.clone()),
                Yaml::Integer(i) => Value::from(*i),
                Yaml::Real(r) => r
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(r.clone())),
                Yaml::Boolean(b) => Value::Bool(*b),
                _ => Value::Null,
            },
            ConfigNode::Branch(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            ConfigNode::Generator(_) => Value::String("<icon generator>".to_string()),
            ConfigNode::Erased => Value::Null,
        }
    }
}

impl From<&str> for ConfigNode {
    fn from(value: &str) -> Self {
        ConfigNode::string(value)
    }
}

impl From<String> for ConfigNode {
    fn from(value: String) -> Self {
        ConfigNode::string(value)
    }
}

impl From<i64> for ConfigNode {
    fn from(value: i64) -> Self {
        ConfigNode::Scalar(Yaml::Integer(value))
    }
}

impl From<IconGenerator> for ConfigNode {
    fn from(value: IconGenerator) -> Self {
        ConfigNode::Generator(value)
    }
}

type GeneratorFn = dyn Fn(&str) -> Result<String, String> + Send + Sync;

/// Produces icon markup for a given color.
///
/// Two flavours exist: templates (markup with `{color}` placeholders, the
/// form available from YAML via the `!icon` tag) and native functions.
/// Equality is structural for templates and by identity for functions.
#[derive(Clone)]
pub struct IconGenerator {
    name: String,
    source: GeneratorSource,
}

#[derive(Clone)]
enum GeneratorSource {
    Template(String),
    Function(Arc<GeneratorFn>),
}

impl IconGenerator {
    /// Create a generator from markup containing `{color}` placeholders.
    pub fn template(markup: impl Into<String>) -> Self {
        Self {
            name: "template".to_string(),
            source: GeneratorSource::Template(markup.into()),
        }
    }

    /// Create a generator from a function.
    ///
    /// The function reports failures as a message; they surface as
    /// [`GeneratorError`] carrying `name`.
    pub fn from_fn<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> Result<String, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            source: GeneratorSource::Function(Arc::new(func)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Produce markup for `color`.
    pub fn generate(&self, color: &str) -> Result<String, GeneratorError> {
        match &self.source {
            GeneratorSource::Template(markup) => Ok(markup.replace(COLOR_PLACEHOLDER, color)),
            GeneratorSource::Function(func) => func(color).map_err(|message| GeneratorError {
                generator: self.name.clone(),
                message,
            }),
        }
    }
}

impl fmt::Debug for IconGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            GeneratorSource::Template(markup) => f
                .debug_tuple("IconGenerator::Template")
                .field(markup)
                .finish(),
            GeneratorSource::Function(_) => f
                .debug_tuple("IconGenerator::Function")
                .field(&self.name)
                .finish(),
        }
    }
}

impl PartialEq for IconGenerator {
    fn eq(&self, other: &Self) -> bool {
        match (&self.source, &other.source) {
            (GeneratorSource::Template(a), GeneratorSource::Template(b)) => a == b,
            (GeneratorSource::Function(a), GeneratorSource::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// An icon generator failed to produce markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("icon generator '{generator}' failed: {message}")]
pub struct GeneratorError {
    pub generator: String,
    pub message: String,
}

/// Errors that can occur while loading or validating configuration trees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Tree nesting exceeds the maximum depth.
    #[error("Config nesting too deep (max depth: {max_depth}) at path: {}", path.join("."))]
    NestingTooDeep {
        /// Maximum allowed depth
        max_depth: usize,
        /// Path where the limit was exceeded
        path: Vec<String>,
    },

    /// The YAML text could not be scanned.
    #[error("YAML parse error: {message}")]
    Parse { message: String },

    /// A YAML construct that has no meaning in a style tree.
    #[error("Unsupported {construct} at line {line}, column {col}")]
    Unsupported {
        construct: &'static str,
        line: usize,
        col: usize,
    },

    /// A YAML tag other than `!icon`.
    #[error("Unknown tag '{tag}' at line {line}, column {col}")]
    UnknownTag { tag: String, line: usize, col: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_branch() {
        let node = ConfigNode::empty();
        assert!(node.is_branch());
        assert!(node.is_empty());
        assert!(!ConfigNode::from("x").is_empty());
        assert!(!ConfigNode::Erased.is_empty());
    }

    #[test]
    fn test_get_path() {
        let node = ConfigNode::branch([(
            "checked",
            ConfigNode::branch([("iconColor", ConfigNode::from("#fff"))]),
        )]);

        assert_eq!(
            node.get_path(&["checked", "iconColor"]).and_then(|n| n.as_str()),
            Some("#fff")
        );
        assert!(node.get_path(&["checked", "missing"]).is_none());
        assert!(node.get_path(&["checked", "iconColor", "deeper"]).is_none());
        assert_eq!(node.get_path(&[]), Some(&node));
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(ConfigNode::from(0_i64).scalar_text().as_deref(), Some("0"));
        assert_eq!(
            ConfigNode::Scalar(Yaml::Real("1.5".into())).scalar_text().as_deref(),
            Some("1.5")
        );
        assert_eq!(ConfigNode::Erased.scalar_text(), None);
    }

    #[test]
    fn test_template_generator() {
        let generator = IconGenerator::template(r#"<svg fill="{color}"/>"#);
        assert_eq!(generator.generate("red").unwrap(), r#"<svg fill="red"/>"#);
        assert_eq!(generator, IconGenerator::template(r#"<svg fill="{color}"/>"#));
    }

    #[test]
    fn test_function_generator_identity() {
        let a = IconGenerator::from_fn("dot", |c| Ok(format!("<circle fill=\"{c}\"/>")));
        let b = IconGenerator::from_fn("dot", |c| Ok(format!("<circle fill=\"{c}\"/>")));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_function_generator_failure() {
        let generator = IconGenerator::from_fn("broken", |_| Err("no markup".to_string()));
        let err = generator.generate("red").unwrap_err();
        assert_eq!(err.generator, "broken");
        assert_eq!(err.to_string(), "icon generator 'broken' failed: no markup");
    }

    #[test]
    fn test_to_json() {
        let node = ConfigNode::branch([
            ("b", ConfigNode::from("1px")),
            ("a", ConfigNode::Erased),
            ("n", ConfigNode::from(0_i64)),
        ]);
        let json = node.to_json();
        assert_eq!(json["b"], "1px");
        assert!(json["a"].is_null());
        assert_eq!(json["n"], 0);
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "n"]);
    }
}
