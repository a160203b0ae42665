//! Path-based lookup into a host-supplied theme tree.
//!
//! Hosts expose their theme as a lookup capability `theme(path, fallback)`:
//! a dotted path such as `"customForms.default.input"` returns the node at
//! that path, or the fallback when nothing is there.

use crate::types::ConfigNode;

/// A read-only theme tree addressed by dotted paths.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeLookup {
    root: ConfigNode,
}

impl ThemeLookup {
    pub fn new(root: ConfigNode) -> Self {
        Self { root }
    }

    /// Get the node at `path`, if any.
    ///
    /// The empty path addresses the root. Path segments are split on `.`, so
    /// keys containing dots are not addressable this way.
    pub fn get(&self, path: &str) -> Option<&ConfigNode> {
        if path.is_empty() {
            return Some(&self.root);
        }
        let segments: Vec<&str> = path.split('.').collect();
        self.root.get_path(&segments)
    }

    /// Get the node at `path`, or `fallback` when it is absent.
    ///
    /// An explicitly erased node counts as absent here: the host had nothing
    /// to offer at that path.
    pub fn theme(&self, path: &str, fallback: ConfigNode) -> ConfigNode {
        match self.get(path) {
            Some(node) if !node.is_erased() => node.clone(),
            _ => fallback,
        }
    }

    /// Keys of the branch at `path`, in declaration order.
    ///
    /// Returns an empty list when `path` does not address a branch.
    pub fn keys(&self, path: &str) -> Vec<String> {
        self.get(path)
            .and_then(ConfigNode::as_branch)
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl From<ConfigNode> for ThemeLookup {
    fn from(root: ConfigNode) -> Self {
        Self::new(root)
    }
}
