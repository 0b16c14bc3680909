//! Helpers for the loosely shaped replies of the automation webhooks.
//!
//! Workflow replies come back either as a single object or as an array of
//! item objects, and language-model text is often wrapped in a Markdown
//! code fence.

use serde_json::Value;

/// The `output` text of a reply: the first item's when the reply is an array,
/// otherwise the object's own.
///
/// A structured (non-string) output is returned as its JSON text.
pub fn first_output(reply: &Value) -> Option<String> {
    let item = match reply {
        Value::Array(items) => items.first()?,
        other => other,
    };
    match item.get("output")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        structured => Some(structured.to_string()),
    }
}

/// All `output` texts of a reply joined with newlines.
///
/// Array items without a string output contribute an empty line. Returns
/// `None` when nothing but whitespace remains.
pub fn joined_output(reply: &Value) -> Option<String> {
    let text = match reply {
        Value::Array(items) => items
            .iter()
            .map(|item| item.get("output").and_then(Value::as_str).unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.get("output").and_then(Value::as_str)?.to_string(),
    };
    if text.trim().is_empty() { None } else { Some(text) }
}

/// Remove a Markdown code fence around a JSON block.
///
/// The first ```` ```json ```` marker (any case) and every remaining
/// ```` ``` ```` are removed, then surrounding whitespace is trimmed.
///
/// ```
/// use locafinder_net::webhook::strip_code_fence;
///
/// assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
/// assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
/// ```
pub fn strip_code_fence(text: &str) -> String {
    const OPEN: &str = "```json";
    let lowered = text.to_ascii_lowercase();
    let without_open = match lowered.find(OPEN) {
        Some(start) => format!("{}{}", &text[..start], &text[start + OPEN.len()..]),
        None => text.to_string(),
    };
    without_open.replace("```", "").trim().to_string()
}
