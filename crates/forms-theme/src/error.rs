//! Error types for style resolution.
//!
//! Copyright (c) 2025 Posit, PBC

use forms_config::ConfigError;
use thiserror::Error;

use crate::component::ComponentKind;
use crate::encode::EncodingError;

/// Errors that can occur while resolving one variant × component pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormsError {
    /// A merge or expansion source is not a well-formed tree
    #[error("Malformed configuration at {}: {message}", display_path(path))]
    MalformedConfiguration { path: Vec<String>, message: String },

    /// An icon could not be produced for a component
    #[error("Cannot resolve icon for {kind} at {}: {message}", display_path(path))]
    IconResolution {
        kind: ComponentKind,
        path: Vec<String>,
        message: String,
    },

    /// The icon encoder rejected the markup
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The configuration tree itself is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl FormsError {
    pub(crate) fn malformed(path: &[&str], message: impl Into<String>) -> Self {
        FormsError::MalformedConfiguration {
            path: path.iter().map(|s| s.to_string()).collect(),
            message: message.into(),
        }
    }

    /// Diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            FormsError::MalformedConfiguration { .. } => "F-1-1",
            FormsError::Config(_) => "F-1-2",
            FormsError::IconResolution { .. } => "F-2-1",
            FormsError::Encoding(_) => "F-3-1",
        }
    }

    /// Short title used in diagnostics.
    pub fn title(&self) -> &'static str {
        match self {
            FormsError::MalformedConfiguration { .. } => "Malformed configuration",
            FormsError::Config(_) => "Invalid configuration tree",
            FormsError::IconResolution { .. } => "Icon resolution failed",
            FormsError::Encoding(_) => "Icon encoding failed",
        }
    }
}

fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(".")
    }
}
