//! XPath string literals.

use serde::{Deserialize, Serialize};

/// How attribute values and text are interpolated into generated XPath.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotePolicy {
    /// Wrap in single quotes as-is. A value containing `'` yields a query
    /// the engine rejects as an invalid selector.
    #[default]
    Verbatim,

    /// Emit a literal that is valid for any value, falling back to
    /// `concat()` when both quote characters are present.
    Escape,
}

impl QuotePolicy {
    pub fn literal(self, value: &str) -> String {
        match self {
            QuotePolicy::Verbatim => format!("'{}'", value),
            QuotePolicy::Escape => escaped_literal(value),
        }
    }
}

fn escaped_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }

    // XPath 1.0 has no escape sequence; split on `'` and rejoin with a
    // double-quoted apostrophe.
    let mut parts = Vec::new();
    for (i, chunk) in value.split('\'').enumerate() {
        if i > 0 {
            parts.push("\"'\"".to_string());
        }
        if !chunk.is_empty() {
            parts.push(format!("'{}'", chunk));
        }
    }
    format!("concat({})", parts.join(", "))
}
