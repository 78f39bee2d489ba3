//! Validation and normalization of user-authored JSON text.
//!
//! Phone keyboards substitute typographic quotes while typing; these are
//! mapped back to ASCII before the text is validated or submitted.

use serde::Serialize;
use serde_json::Value;

/// Reason reported for any text that does not parse as JSON.
pub const INVALID_JSON: &str = "Invalid JSON format";

/// Typographic quote -> ASCII replacement.
pub const QUOTE_MAP: [(char, char); 6] = [
    ('\u{201C}', '"'),  // left double
    ('\u{201D}', '"'),  // right double
    ('\u{201E}', '"'),  // low double
    ('\u{2018}', '\''), // left single
    ('\u{2019}', '\''), // right single
    ('\u{201A}', '\''), // low single
];

fn normalize_char(c: char) -> char {
    QUOTE_MAP
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// Replace typographic quotes with their ASCII equivalents.
pub fn normalize(text: &str) -> String {
    text.chars().map(normalize_char).collect()
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Validation {
    /// Empty or whitespace-only: nothing to validate yet.
    Empty,
    Valid,
    Invalid { reason: &'static str },
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid)
    }

    /// The error to surface, if any. `Empty` surfaces nothing.
    pub fn error(&self) -> Option<&'static str> {
        match self {
            Validation::Invalid { reason } => Some(reason),
            _ => None,
        }
    }
}

pub fn validate(text: &str) -> Validation {
    if text.trim().is_empty() {
        return Validation::Empty;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(_) => Validation::Valid,
        Err(_) => Validation::Invalid {
            reason: INVALID_JSON,
        },
    }
}

/// Pretty-print with two-space indentation. Key order is preserved; text that
/// does not parse is returned unchanged.
pub fn format(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| text.to_string())
}
