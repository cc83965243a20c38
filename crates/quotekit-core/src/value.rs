//! Raw input values captured from a rendered quote form.

use serde::{Deserialize, Serialize};

/// One raw answer from the form.
///
/// The form renderer hands the engine numbers, strings, booleans, or string
/// arrays (multi-select); the untagged serde form accepts exactly those
/// shapes from JSON and TOML documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl RawValue {
    /// Lenient numeric reading: numbers pass through, numeric strings parse,
    /// everything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) | Self::List(_) => None,
        }
    }

    /// Truthiness used by checkbox coercion and boolean comparisons:
    /// non-empty and not the literal `"false"` / `"0"`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::Text(s) => !s.is_empty() && s != "false" && s != "0",
            Self::List(items) => !items.is_empty(),
        }
    }

    /// Returns `true` for values a presence condition treats as absent.
    ///
    /// Booleans and numbers are always present once captured; an unchecked
    /// checkbox is an answer, not a blank.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// Canonical text form used for equality against option values.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::List(items) => items.join(","),
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}
