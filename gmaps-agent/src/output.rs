//! Binding of a stage's final answer to its output key.

use gmaps_core::{GmapsError, OutputKey, Result};
use serde_json::Value;

/// Removes a surrounding Markdown code fence, with or without a language tag.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Extracts the value a stage produced for `key`.
///
/// A JSON object answer is read at [`OutputKey::json_property`]; a JSON
/// object without that property is malformed. A JSON string is unquoted and
/// anything else is taken as trimmed plain text. A blank answer is malformed.
pub fn bind_output(key: OutputKey, text: &str) -> Result<String> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(GmapsError::Agent(format!("malformed output for '{}': empty answer", key)));
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get(key.json_property()) {
            Some(Value::String(s)) => Ok(s.trim().to_string()),
            Some(Value::Null) => Ok(String::new()),
            Some(other) => Ok(other.to_string()),
            None => Err(GmapsError::Agent(format!(
                "malformed output for '{}': missing property '{}' in {}",
                key,
                key.json_property(),
                body
            ))),
        },
        Ok(Value::String(s)) => Ok(s.trim().to_string()),
        _ => Ok(body.to_string()),
    }
}
