//! Structured reports for component rules that failed to resolve.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Each diagnostic follows a fixed structure:
//! 1. **Code**: stable identifier such as `F-2-1`
//! 2. **Title**: brief description
//! 3. **Kind**: error or warning
//! 4. **Problem**: what went wrong
//! 5. **Details**: where it went wrong (variant, component, path)
//! 6. **Hints**: optional guidance for fixing

use serde::{Deserialize, Serialize};

use crate::component::ComponentKind;
use crate::error::FormsError;

/// The kind of diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// The affected rule was excluded from the output
    Error,
    /// The input was partly ignored; output is still produced
    Warning,
}

/// A report about one variant × component resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    pub title: String,

    pub kind: DiagnosticKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,

    /// Variant the diagnostic is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    /// Component the diagnostic is about, when a single one is affected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentKind>,
}

impl Diagnostic {
    pub fn error(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Warning, title)
    }

    fn new(kind: DiagnosticKind, title: impl Into<String>) -> Self {
        Self {
            code: None,
            title: title.into(),
            kind,
            problem: None,
            details: Vec::new(),
            hints: Vec::new(),
            variant: None,
            component: None,
        }
    }

    /// Build an error diagnostic from a resolution failure.
    pub fn from_error(err: &FormsError, variant: &str, component: Option<ComponentKind>) -> Self {
        let mut diagnostic = Diagnostic::error(err.title())
            .with_code(err.code())
            .problem(err.to_string())
            .for_variant(variant);
        if let Some(kind) = component {
            diagnostic = diagnostic.for_component(kind);
        }
        match err {
            FormsError::IconResolution { kind, .. } if !kind.supports_icon() => {
                diagnostic.add_hint(format!("`{}` does not draw an icon; remove `icon`/`iconColor`?", kind))
            }
            _ => diagnostic,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn problem(mut self, problem: impl Into<String>) -> Self {
        self.problem = Some(problem.into());
        self
    }

    pub fn add_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    pub fn add_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn for_variant(mut self, variant: impl Into<String>) -> Self {
        let variant = variant.into();
        self.details.push(format!("in variant `{}`", variant));
        self.variant = Some(variant);
        self
    }

    pub fn for_component(mut self, kind: ComponentKind) -> Self {
        self.details.push(format!("for component `{}`", kind));
        self.component = Some(kind);
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }

    /// Render as plain text, one line per part.
    pub fn to_text(&self) -> String {
        let mut text = match (&self.code, self.kind) {
            (Some(code), DiagnosticKind::Error) => format!("Error [{}]: {}", code, self.title),
            (Some(code), DiagnosticKind::Warning) => format!("Warning [{}]: {}", code, self.title),
            (None, DiagnosticKind::Error) => format!("Error: {}", self.title),
            (None, DiagnosticKind::Warning) => format!("Warning: {}", self.title),
        };
        if let Some(problem) = &self.problem {
            text.push_str(&format!("\n{}", problem));
        }
        for detail in &self.details {
            text.push_str(&format!("\n✖ {}", detail));
        }
        for hint in &self.hints {
            text.push_str(&format!("\nℹ {}", hint));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let diagnostic = Diagnostic::warning("Unknown component")
            .with_code("F-1-3")
            .problem("`button` is not a form component")
            .for_variant("sm");

        assert_eq!(diagnostic.kind, DiagnosticKind::Warning);
        assert!(!diagnostic.is_error());
        assert_eq!(diagnostic.variant.as_deref(), Some("sm"));
        assert_eq!(diagnostic.details, vec!["in variant `sm`"]);
    }

    #[test]
    fn test_from_error() {
        let err = FormsError::IconResolution {
            kind: ComponentKind::Input,
            path: vec!["icon".into()],
            message: "no default icon".into(),
        };
        let diagnostic = Diagnostic::from_error(&err, "default", Some(ComponentKind::Input));

        assert!(diagnostic.is_error());
        assert_eq!(diagnostic.code.as_deref(), Some("F-2-1"));
        assert_eq!(diagnostic.component, Some(ComponentKind::Input));
        assert_eq!(diagnostic.hints.len(), 1);
    }

    #[test]
    fn test_malformed_has_no_hint() {
        let err = FormsError::malformed(&["default", "select"], "component overrides must be a mapping");
        let diagnostic = Diagnostic::from_error(&err, "default", Some(ComponentKind::Select));

        assert_eq!(diagnostic.code.as_deref(), Some("F-1-1"));
        assert!(diagnostic.hints.is_empty());
    }

    #[test]
    fn test_add_detail_after_context() {
        let diagnostic = Diagnostic::warning("Icon ignored")
            .for_component(ComponentKind::Checkbox)
            .add_detail("at `checked`");
        assert_eq!(
            diagnostic.details,
            vec!["for component `checkbox`", "at `checked`"]
        );
    }

    #[test]
    fn test_to_text() {
        let text = Diagnostic::error("Icon encoding failed")
            .with_code("F-3-1")
            .problem("empty markup")
            .for_variant("default")
            .to_text();
        assert_eq!(
            text,
            "Error [F-3-1]: Icon encoding failed\nempty markup\n✖ in variant `default`"
        );
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(
            Diagnostic::error("Malformed configuration")
                .with_code("F-1-1")
                .for_component(ComponentKind::Radio),
        )
        .unwrap();

        assert_eq!(json["kind"], "error");
        assert_eq!(json["component"], "radio");
        assert!(json.get("hints").is_none());
    }
}
