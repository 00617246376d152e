//! Response envelope handling
//!
//! The forms API is not consistent about where it puts things. Everything
//! that copes with that lives here so the client proper can stay simple.

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Outcome of looking for a form id in a create-form response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormIdLookup {
    Found(String),
    NotFound,
}

impl FormIdLookup {
    pub fn into_option(self) -> Option<String> {
        match self {
            FormIdLookup::Found(id) => Some(id),
            FormIdLookup::NotFound => None,
        }
    }
}

/// Find the form id in a create-form response body.
///
/// Checks `form_id`, then `formId`, then the same keys inside a
/// JSON-encoded string under `body` (an unwrapped gateway proxy response).
pub fn normalize_form_id(body: &Value) -> FormIdLookup {
    if let Some(id) = top_level_id(body) {
        return FormIdLookup::Found(id);
    }

    body.get("body")
        .and_then(Value::as_str)
        .and_then(|nested| serde_json::from_str::<Value>(nested).ok())
        .and_then(|nested| top_level_id(&nested))
        .map_or(FormIdLookup::NotFound, FormIdLookup::Found)
}

fn top_level_id(body: &Value) -> Option<String> {
    ["form_id", "formId"]
        .iter()
        .find_map(|key| id_value(body.get(*key)?))
}

fn id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Serde adapter for ids the service sends as either strings or numbers.
///
/// `null`, `""` and any other shape read as absent.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_value))
}

/// The `message` field, else the `error` field, of an API body.
///
/// Any non-null `message` wins, even an empty one. `error` is used when it
/// is a string or some other non-falsy value; `false`, `0` and `null` are
/// skipped. Non-string values are stringified as JSON.
pub fn body_message(body: &Value) -> Option<String> {
    let stringify = |value: &Value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    match body.get("message") {
        Some(Value::Null) | None => {}
        Some(message) => return Some(stringify(message)),
    }
    match body.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        error => Some(stringify(error)),
    }
}

/// Best-effort user message for a failed call
pub fn extract_error_message(status: StatusCode, raw: &str, fallback: &str) -> String {
    let status_only = || format!("{}: ({})", fallback, status.as_u16());

    if raw.trim().is_empty() {
        return status_only();
    }
    let Ok(body) = serde_json::from_str::<Value>(raw) else {
        return status_only();
    };

    let message = body_message(&body).unwrap_or_else(|| format!("{}: {}", fallback, raw));
    match body.get("path") {
        Some(Value::String(path)) => format!("{} (path: {})", message, path),
        Some(Value::Null) | None => message,
        Some(path) => format!("{} (path: {})", message, path),
    }
}
