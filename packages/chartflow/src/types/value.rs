//! The atomic value model shared by every pipeline stage.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One record of a tabular dataset: field name → value, insertion-ordered.
pub type DataRow = IndexMap<String, DataValue>;

/// An atomic, immutable cell value.
///
/// Serialized untagged, so a row round-trips as plain JSON
/// (`{"city": "Beijing", "temp": 22.0}`). Dates serialize as ISO-8601.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Null,
    Bool(bool),
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

impl DataValue {
    /// Whether this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Permissive numeric view of this value.
    ///
    /// Numbers pass through; text is parsed after stripping currency and
    /// percent symbols and thousands separators. Booleans and dates do not
    /// coerce.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) => Some(*n),
            DataValue::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Text view of this value, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render this value for display (labels, insights).
    pub fn display(&self) -> String {
        match self {
            DataValue::Null => String::new(),
            DataValue::Bool(b) => b.to_string(),
            DataValue::Number(n) => format_number(*n),
            DataValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            DataValue::Text(s) => s.clone(),
        }
    }

    /// Convert a JSON value into a [`DataValue`].
    ///
    /// Strings stay raw text here; type coercion is the schema engine's job.
    /// Arrays and objects are flattened to their JSON text.
    pub fn from_json(value: &serde_json::Value) -> DataValue {
        match value {
            serde_json::Value::Null => DataValue::Null,
            serde_json::Value::Bool(b) => DataValue::Bool(*b),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => DataValue::Number(f),
                None => DataValue::Text(n.to_string()),
            },
            serde_json::Value::String(s) => DataValue::Text(s.clone()),
            other => DataValue::Text(other.to_string()),
        }
    }
}

impl From<f64> for DataValue {
    fn from(n: f64) -> Self {
        DataValue::Number(n)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Text(s)
    }
}

impl From<bool> for DataValue {
    fn from(b: bool) -> Self {
        DataValue::Bool(b)
    }
}

/// Permissive numeric parse.
///
/// Trims, then strips currency symbols, percent signs, and thousands
/// separators before parsing: `"1,200"` → 1200, `"$50"` → 50, `"  7 "` → 7.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let stripped: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ',' | '，' | '$' | '¥' | '￥' | '€' | '£' | '%' | '％' | ' '))
        .collect();
    let parsed: f64 = stripped.parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Format a number for human-readable output: integers without a fraction,
/// everything else with one decimal place.
pub fn format_number(n: f64) -> String {
    if (n - n.round()).abs() < f64::EPSILON && n.abs() < 1e15 {
        format!("{}", n.round() as i64)
    } else {
        format!("{n:.1}")
    }
}
