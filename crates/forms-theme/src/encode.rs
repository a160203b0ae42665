//! Markup-to-URI encoding boundary.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Icon substitution hands generated markup to an [`IconEncoder`] and embeds
//! whatever it returns in `url("...")`. Encoders are pure functions; a failure
//! is reported against the component being resolved.

use thiserror::Error;

/// The encoder rejected the markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Icon encoding failed: {message}")]
pub struct EncodingError {
    pub message: String,
}

impl EncodingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Turns icon markup into a URI usable inside `url("...")`.
pub trait IconEncoder: Send + Sync {
    fn encode(&self, markup: &str) -> Result<String, EncodingError>;
}

impl<F> IconEncoder for F
where
    F: Fn(&str) -> Result<String, EncodingError> + Send + Sync,
{
    fn encode(&self, markup: &str) -> Result<String, EncodingError> {
        self(markup)
    }
}

const DATA_URI_PREFIX: &str = "data:image/svg+xml,";

/// Compact `data:` URI encoding for SVG markup.
///
/// The markup is minimally escaped rather than base64-encoded:
/// - a leading byte order mark is dropped
/// - whitespace runs collapse to a single space and the ends are trimmed
/// - double quotes become single quotes (the URI sits inside `url("...")`)
/// - everything else is percent-encoded like `encodeURIComponent`, except that
///   space, `=`, `:` and `/` stay readable and hex digits are lowercase
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgDataUri;

impl IconEncoder for SvgDataUri {
    fn encode(&self, markup: &str) -> Result<String, EncodingError> {
        let markup = markup.strip_prefix('\u{feff}').unwrap_or(markup);
        let collapsed = markup.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            return Err(EncodingError::new("icon markup is empty"));
        }

        let mut encoded = String::with_capacity(DATA_URI_PREFIX.len() + collapsed.len());
        encoded.push_str(DATA_URI_PREFIX);
        for ch in collapsed.chars() {
            let ch = if ch == '"' { '\'' } else { ch };
            if is_unreserved(ch) || matches!(ch, ' ' | '=' | ':' | '/') {
                encoded.push(ch);
            } else {
                let mut buf = [0u8; 4];
                for byte in ch.encode_utf8(&mut buf).bytes() {
                    encoded.push_str(&format!("%{:02x}", byte));
                }
            }
        }
        Ok(encoded)
    }
}

/// Characters `encodeURIComponent` leaves untouched.
fn is_unreserved(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(ch, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
}
