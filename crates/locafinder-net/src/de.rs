//! Lenient deserializers for hand-edited spreadsheet data.
//!
//! The automation backend forwards rows as-is, so numeric columns can arrive
//! as JSON numbers, numeric strings, empty strings or `null`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

fn parse_lenient(value: NumberOrString) -> Option<f64> {
    match value {
        NumberOrString::Number(n) => Some(n),
        NumberOrString::Text(s) => s.trim().parse::<f64>().ok(),
        NumberOrString::Other(_) => None,
    }
    .filter(|n| n.is_finite())
}

/// Deserialize an optional number that may be encoded as a string.
///
/// Anything that does not parse to a finite number becomes `None`.
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(value.and_then(parse_lenient))
}

/// Deserialize a number that may be encoded as a string, defaulting to zero.
pub fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_number(deserializer)?.unwrap_or(0.0))
}

/// Deserialize a string field that may arrive as a number or `null`.
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Deserialize an optional string, treating blank text as absent.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = string_or_empty(deserializer)?;
    Ok(if text.trim().is_empty() { None } else { Some(text) })
}
