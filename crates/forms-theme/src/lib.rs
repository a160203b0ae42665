//! Form control style resolution.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate turns a user theme (variants of per-component overrides) into
//! fully-resolved component rules:
//! - Shorthand group keys (`"input, textarea"`) expanded into one entry per component
//! - Built-in defaults merged under the `default` variant's overrides
//! - `icon`/`iconColor` pairs replaced by an encoded `backgroundImage`
//! - One `(selector, rule)` pair per non-empty variant × component
//!
//! Failures are isolated per variant × component: a broken entry is reported
//! as a [`Diagnostic`] and left out, every other rule is still produced.

mod component;
mod defaults;
mod diagnostic;
mod encode;
mod error;
mod expand;
mod icons;
mod rule;
mod variant;

pub use component::ComponentKind;
pub use defaults::{builtin_defaults, colors};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use encode::{EncodingError, IconEncoder, SvgDataUri};
pub use error::FormsError;
pub use expand::{expand, expand_collecting, split_group_key};
pub use icons::IconSubstitution;
pub use rule::{ComponentRule, base_utilities, layout, modifier_for, selector_for};
pub use variant::{DEFAULT_VARIANT, Resolution, VariantResolver};
