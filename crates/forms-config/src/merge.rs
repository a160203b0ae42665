//! Deep merge of ordered configuration layers.
//!
//! Layers are ordered by priority: first = lowest priority, last = highest.
//! For every key in the union of the layers' branches the resolved value is
//! computed left to right:
//!
//! - a key **present** in a later layer wins, whatever its value
//! - when both the winning value and the current value are branches, they are
//!   merged key by key instead of replaced
//! - a present-but-undefined value ([`ConfigNode::Erased`]) resolves to an
//!   explicit erasure marker rather than the inherited value
//! - a key **absent** from a later layer keeps the inherited value
//! - across type boundaries (leaf vs branch) the later layer wins outright
//!
//! Because the merge is a left fold of [`merge_pair`], it is associative:
//! `merge([a, b, c]) == merge([merge([a, b]), c])`.
//!
//! # Depth Limiting
//!
//! Merging is total over well-formed trees. Degenerate inputs (trees nested
//! deeper than any style tree could be) are detected by [`validate_depth`],
//! which callers run on their layers before merging and report as a
//! configuration error.

use indexmap::IndexMap;

use crate::types::{ConfigError, ConfigNode};

/// Options for layer validation.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Maximum nesting depth (default: 64).
    pub max_depth: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// Merge layers into one resolved tree.
///
/// An empty layer list resolves to an empty branch. The inputs are not
/// modified; the result shares no structure with them.
pub fn merge(layers: &[&ConfigNode]) -> ConfigNode {
    let mut resolved: Option<ConfigNode> = None;
    for layer in layers {
        resolved = Some(merge_pair(resolved.as_ref(), layer));
    }
    resolved.unwrap_or_else(ConfigNode::empty)
}

/// Merge a single higher-priority layer onto an inherited value.
///
/// `base` is `None` when nothing has been inherited at this position.
pub fn merge_pair(base: Option<&ConfigNode>, overlay: &ConfigNode) -> ConfigNode {
    match (base, overlay) {
        (Some(ConfigNode::Branch(base_map)), ConfigNode::Branch(overlay_map)) => {
            let mut merged: IndexMap<String, ConfigNode> =
                IndexMap::with_capacity(base_map.len().max(overlay_map.len()));

            // Keys from the inherited value first, in their order
            for (key, base_value) in base_map {
                let value = match overlay_map.get(key) {
                    Some(overlay_value) => merge_pair(Some(base_value), overlay_value),
                    None => base_value.clone(),
                };
                merged.insert(key.clone(), value);
            }

            // Then keys only the overlay knows about
            for (key, overlay_value) in overlay_map {
                if !merged.contains_key(key) {
                    merged.insert(key.clone(), overlay_value.clone());
                }
            }

            ConfigNode::Branch(merged)
        }
        // Type mismatch, leaf override or erasure: the overlay wins outright
        _ => overlay.clone(),
    }
}

/// Check that a tree does not exceed `options.max_depth`.
pub fn validate_depth(node: &ConfigNode, options: &MergeOptions) -> Result<(), ConfigError> {
    validate_depth_at(node, 0, options, &mut Vec::new())
}

fn validate_depth_at(
    node: &ConfigNode,
    depth: usize,
    options: &MergeOptions,
    path: &mut Vec<String>,
) -> Result<(), ConfigError> {
    if depth > options.max_depth {
        return Err(ConfigError::NestingTooDeep {
            max_depth: options.max_depth,
            path: path.clone(),
        });
    }

    if let ConfigNode::Branch(map) = node {
        for (key, child) in map {
            path.push(key.clone());
            validate_depth_at(child, depth + 1, options, path)?;
            path.pop();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IconGenerator;

    // Helpers
    fn scalar(s: &str) -> ConfigNode {
        ConfigNode::string(s)
    }

    fn map(entries: Vec<(&str, ConfigNode)>) -> ConfigNode {
        ConfigNode::branch(entries)
    }

    #[test]
    fn test_later_layer_wins() {
        let a = map(vec![("a", scalar("1")), ("b", scalar("2"))]);
        let b = map(vec![("b", scalar("3")), ("c", scalar("4"))]);

        let merged = merge(&[&a, &b]);

        assert_eq!(merged.get("a"), Some(&scalar("1")));
        assert_eq!(merged.get("b"), Some(&scalar("3")));
        assert_eq!(merged.get("c"), Some(&scalar("4")));
    }

    #[test]
    fn test_key_order_is_inherited_first() {
        let a = map(vec![("x", scalar("1")), ("y", scalar("2"))]);
        let b = map(vec![("z", scalar("3")), ("x", scalar("4"))]);

        let merged = merge(&[&a, &b]);
        let keys: Vec<&str> = merged
            .as_branch()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();

        assert_eq!(keys, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_nested_branches_merge() {
        let defaults = map(vec![
            ("backgroundColor", scalar("white")),
            ("checked", map(vec![("iconColor", scalar("#fff"))])),
        ]);
        let user = map(vec![(
            "checked",
            map(vec![("backgroundColor", scalar("indigo"))]),
        )]);

        let merged = merge(&[&defaults, &user]);

        assert_eq!(merged.get("backgroundColor"), Some(&scalar("white")));
        assert_eq!(
            merged.get_path(&["checked", "backgroundColor"]),
            Some(&scalar("indigo"))
        );
        assert_eq!(
            merged.get_path(&["checked", "iconColor"]),
            Some(&scalar("#fff"))
        );
    }

    #[test]
    fn test_undefined_erases_inherited_value() {
        let a = map(vec![("x", scalar("1"))]);
        let erase = map(vec![("x", ConfigNode::Erased)]);
        let keep = map(vec![]);

        let erased = merge(&[&a, &erase]);
        let kept = merge(&[&a, &keep]);

        assert_eq!(erased.get("x"), Some(&ConfigNode::Erased));
        assert_eq!(kept.get("x"), Some(&scalar("1")));
        assert_ne!(erased, kept);
    }

    #[test]
    fn test_erasure_inside_nested_branch() {
        let a = map(vec![("focus", map(vec![("outline", scalar("none"))]))]);
        let b = map(vec![("focus", map(vec![("outline", ConfigNode::Erased)]))]);

        let merged = merge(&[&a, &b]);
        assert!(merged.get_path(&["focus", "outline"]).unwrap().is_erased());
    }

    #[test]
    fn test_erased_then_redefined() {
        let a = map(vec![("x", scalar("1"))]);
        let b = map(vec![("x", ConfigNode::Erased)]);
        let c = map(vec![("x", map(vec![("y", scalar("2"))]))]);

        let merged = merge(&[&a, &b, &c]);
        assert_eq!(merged.get_path(&["x", "y"]), Some(&scalar("2")));
    }

    #[test]
    fn test_type_mismatch_later_wins() {
        let leaf_first = map(vec![("x", scalar("1"))]);
        let branch_first = map(vec![("x", map(vec![("y", scalar("2"))]))]);

        let branch_wins = merge(&[&leaf_first, &branch_first]);
        assert_eq!(branch_wins.get_path(&["x", "y"]), Some(&scalar("2")));

        let leaf_wins = merge(&[&branch_first, &leaf_first]);
        assert_eq!(leaf_wins.get("x"), Some(&scalar("1")));
    }

    #[test]
    fn test_generator_replaces_leaf() {
        let generator = IconGenerator::template("<svg fill=\"{color}\"/>");
        let a = map(vec![("icon", scalar("<svg/>"))]);
        let b = map(vec![("icon", ConfigNode::Generator(generator.clone()))]);

        let merged = merge(&[&a, &b]);
        assert_eq!(merged.get("icon"), Some(&ConfigNode::Generator(generator)));
    }

    #[test]
    fn test_associativity() {
        let a = map(vec![
            ("a", scalar("1")),
            ("n", map(vec![("x", scalar("1")), ("y", scalar("1"))])),
        ]);
        let b = map(vec![
            ("b", scalar("2")),
            ("n", map(vec![("x", ConfigNode::Erased)])),
        ]);
        let c = map(vec![
            ("a", ConfigNode::Erased),
            ("n", map(vec![("z", scalar("3"))])),
        ]);

        let flat = merge(&[&a, &b, &c]);
        let ab = merge(&[&a, &b]);
        let nested_left = merge(&[&ab, &c]);
        let bc = merge(&[&b, &c]);
        let nested_right = merge(&[&a, &bc]);

        assert_eq!(flat, nested_left);
        assert_eq!(flat, nested_right);
    }

    #[test]
    fn test_merge_is_deterministic_and_pure() {
        let a = map(vec![("x", map(vec![("y", scalar("1"))]))]);
        let b = map(vec![("x", map(vec![("z", scalar("2"))]))]);
        let a_before = a.clone();

        let first = merge(&[&a, &b]);
        let second = merge(&[&a, &b]);

        assert_eq!(first, second);
        assert_eq!(a, a_before);
    }

    #[test]
    fn test_merge_empty_layers() {
        assert_eq!(merge(&[]), ConfigNode::empty());
    }

    #[test]
    fn test_depth_limit_exceeded() {
        fn deep_map(depth: usize) -> ConfigNode {
            if depth == 0 {
                scalar("leaf")
            } else {
                map(vec![("nested", deep_map(depth - 1))])
            }
        }

        let config = deep_map(10);

        let options = MergeOptions { max_depth: 5 };
        match validate_depth(&config, &options) {
            Err(ConfigError::NestingTooDeep { max_depth, path }) => {
                assert_eq!(max_depth, 5);
                assert_eq!(path.len(), 6);
            }
            other => panic!("expected NestingTooDeep error, got {:?}", other),
        }

        assert!(validate_depth(&config, &MergeOptions::default()).is_ok());
    }
}
