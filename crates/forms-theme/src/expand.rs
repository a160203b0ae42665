//! Shorthand group key expansion.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! A variant's top-level keys may name several components at once:
//!
//! ```yaml
//! "input, textarea":
//!   borderColor: red
//! textarea:
//!   borderColor: blue
//! ```
//!
//! Expansion splits every key on `", "` and gives each label its own entry.
//! When several keys mention the same label, their subtrees are merged in
//! declaration order, so later keys extend or override earlier ones. The
//! example above resolves to `input.borderColor = red` and
//! `textarea.borderColor = blue`.
//!
//! Only the top level is expanded; nested keys are left untouched.

use forms_config::{ConfigNode, IndexMap, merge};
use tracing::debug;

use crate::error::FormsError;

/// Separator between labels in a group key.
const GROUP_SEPARATOR: &str = ", ";

/// Split a group key into its labels.
///
/// The grammar is strict: labels are non-empty identifiers (ASCII letters,
/// digits, `-` and `_`) separated by exactly `", "`.
///
/// # Example
///
/// ```
/// use forms_theme::split_group_key;
///
/// assert_eq!(split_group_key("input, textarea").unwrap(), vec!["input", "textarea"]);
/// assert!(split_group_key("input,textarea").is_err());
/// ```
pub fn split_group_key(key: &str) -> Result<Vec<&str>, FormsError> {
    let labels: Vec<&str> = key.split(GROUP_SEPARATOR).collect();
    for label in &labels {
        if label.is_empty() {
            return Err(FormsError::malformed(
                &[key],
                "group key has an empty label",
            ));
        }
        if let Some(bad) = label
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(FormsError::malformed(
                &[key],
                format!("label '{}' contains '{}'", label, bad),
            ));
        }
    }
    Ok(labels)
}

/// Expand the group keys of `tree`, failing on the first malformed key.
pub fn expand(tree: &ConfigNode) -> Result<ConfigNode, FormsError> {
    let mut errors = Vec::new();
    let expanded = expand_collecting(tree, &mut errors)?;
    match errors.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(expanded),
    }
}

/// Expand the group keys of `tree`, skipping malformed keys.
///
/// Every skipped key is reported in `errors`; the remaining keys are still
/// expanded. A `tree` that is not a branch cannot be expanded at all and is
/// returned as an error.
pub fn expand_collecting(
    tree: &ConfigNode,
    errors: &mut Vec<FormsError>,
) -> Result<ConfigNode, FormsError> {
    let map = match tree {
        ConfigNode::Branch(map) => map,
        ConfigNode::Erased => return Ok(ConfigNode::empty()),
        _ => {
            return Err(FormsError::malformed(
                &[],
                "expected a mapping of component names to options",
            ));
        }
    };

    // Subtrees per label, in declaration order
    let mut sources: IndexMap<&str, Vec<&ConfigNode>> = IndexMap::new();
    for (key, value) in map {
        match split_group_key(key) {
            Ok(labels) => {
                if labels.len() > 1 {
                    debug!(group = %key, labels = labels.len(), "expanding group key");
                }
                for label in labels {
                    sources.entry(label).or_default().push(value);
                }
            }
            Err(err) => errors.push(err),
        }
    }

    let expanded = sources
        .into_iter()
        .map(|(label, layers)| (label.to_string(), merge(&layers)))
        .collect();
    Ok(ConfigNode::Branch(expanded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(s: &str) -> ConfigNode {
        ConfigNode::string(s)
    }

    fn map(entries: Vec<(&str, ConfigNode)>) -> ConfigNode {
        ConfigNode::branch(entries)
    }

    #[test]
    fn test_split_single_label() {
        assert_eq!(split_group_key("select").unwrap(), vec!["select"]);
    }

    #[test]
    fn test_split_rejects_malformed_keys() {
        assert!(split_group_key("").is_err());
        assert!(split_group_key("input, ").is_err());
        assert!(split_group_key(", input").is_err());
        assert!(split_group_key("input,  textarea").is_err());
        assert!(split_group_key("input,textarea").is_err());
        assert!(split_group_key("input , textarea").is_err());
    }

    #[test]
    fn test_later_declaration_wins_per_label() {
        let tree = map(vec![
            ("input, textarea", map(vec![("borderColor", scalar("red"))])),
            ("textarea", map(vec![("borderColor", scalar("blue"))])),
        ]);

        let expanded = expand(&tree).unwrap();

        assert_eq!(
            expanded.get_path(&["input", "borderColor"]),
            Some(&scalar("red"))
        );
        assert_eq!(
            expanded.get_path(&["textarea", "borderColor"]),
            Some(&scalar("blue"))
        );
    }

    #[test]
    fn test_groups_merge_rather_than_overwrite() {
        let tree = map(vec![
            (
                "checkbox, radio",
                map(vec![("focus", map(vec![("outline", scalar("none"))]))]),
            ),
            (
                "radio",
                map(vec![("focus", map(vec![("boxShadow", scalar("none"))]))]),
            ),
        ]);

        let expanded = expand(&tree).unwrap();

        assert_eq!(
            expanded.get_path(&["radio", "focus", "outline"]),
            Some(&scalar("none"))
        );
        assert_eq!(
            expanded.get_path(&["radio", "focus", "boxShadow"]),
            Some(&scalar("none"))
        );
        assert!(expanded.get_path(&["checkbox", "focus", "boxShadow"]).is_none());
    }

    #[test]
    fn test_label_order_is_first_appearance() {
        let tree = map(vec![
            ("select, input", map(vec![])),
            ("radio", map(vec![])),
            ("input", map(vec![])),
        ]);

        let expanded = expand(&tree).unwrap();
        let keys: Vec<&str> = expanded
            .as_branch()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["select", "input", "radio"]);
    }

    #[test]
    fn test_nested_keys_untouched() {
        let tree = map(vec![(
            "input",
            map(vec![("a, b", scalar("kept"))]),
        )]);

        let expanded = expand(&tree).unwrap();
        assert_eq!(expanded.get_path(&["input", "a, b"]), Some(&scalar("kept")));
    }

    #[test]
    fn test_expand_is_idempotent() {
        let tree = map(vec![
            ("input, textarea", map(vec![("color", scalar("red"))])),
            ("textarea", map(vec![("color", ConfigNode::Erased)])),
        ]);

        let once = expand(&tree).unwrap();
        let twice = expand(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_collecting_skips_malformed_keys() {
        let tree = map(vec![
            ("input, ", map(vec![("color", scalar("red"))])),
            ("select", map(vec![("color", scalar("blue"))])),
        ]);

        let mut errors = Vec::new();
        let expanded = expand_collecting(&tree, &mut errors).unwrap();

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], FormsError::MalformedConfiguration { .. }));
        assert!(expanded.get("input").is_none());
        assert!(expanded.get("select").is_some());

        assert!(expand(&tree).is_err());
    }

    #[test]
    fn test_non_branch_rejected() {
        assert!(expand(&scalar("input")).is_err());
        assert_eq!(expand(&ConfigNode::Erased).unwrap(), ConfigNode::empty());
    }
}
