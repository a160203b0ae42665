//! Style configuration trees with layered merge semantics.
//!
//! This crate provides the data model and merge engine used to resolve
//! partially-specified style configuration (user overrides layered on
//! built-in defaults) into fully-resolved option trees.
//!
//! # Key Features
//!
//! - **Tagged tree**: [`ConfigNode`] is a closed union of scalars, branches,
//!   icon generators and explicit erasure markers
//! - **Explicit erasure**: a key present with a null value erases the
//!   inherited value instead of keeping it
//! - **Associativity**: `merge([a, b, c]) == merge([merge([a, b]), c])`
//! - **YAML loading**: themes are read with `yaml-rust2`, with `!icon`
//!   tagged scalars becoming icon generator templates
//!
//! # Example
//!
//! ```rust
//! use forms_config::{merge, parse};
//!
//! let defaults = parse("borderColor: gray\nfocus:\n  outline: none").unwrap();
//! let user = parse("borderColor: red\nfocus:\n  outline: ~").unwrap();
//!
//! let resolved = merge(&[&defaults, &user]);
//! assert_eq!(resolved.get("borderColor").and_then(|v| v.as_str()), Some("red"));
//! assert!(resolved.get_path(&["focus", "outline"]).unwrap().is_erased());
//! ```

mod lookup;
mod merge;
mod parser;
mod types;

pub use types::{ConfigError, ConfigNode, GeneratorError, IconGenerator};

pub use merge::{MergeOptions, merge, merge_pair, validate_depth};

pub use parser::{parse, parse_file};

pub use lookup::ThemeLookup;

// Re-export for convenience
pub use indexmap::IndexMap;
pub use yaml_rust2::Yaml;
