//! Answers and submission payloads

use crate::field::{Field, FieldId, FieldType};
use crate::validation::parse_number;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A single scalar answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Number(serde_json::Number),
    Text(String),
}

impl AnswerValue {
    /// Coerce a trimmed input into the wire value for `field_type`.
    ///
    /// Number fields become JSON numbers, integral inputs staying integral.
    /// Returns `None` for a number field whose input does not parse.
    pub fn from_input(field_type: FieldType, trimmed: &str) -> Option<Self> {
        match field_type {
            FieldType::Number => {
                if let Ok(n) = trimmed.parse::<i64>() {
                    return Some(AnswerValue::Number(n.into()));
                }
                parse_number(trimmed)
                    .and_then(serde_json::Number::from_f64)
                    .map(AnswerValue::Number)
            }
            _ => Some(AnswerValue::Text(trimmed.to_string())),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Number(n) => write!(f, "{}", n),
            AnswerValue::Text(s) => f.write_str(s),
        }
    }
}

/// Answers keyed by field label
pub type Answers = BTreeMap<String, AnswerValue>;

/// A stored response as returned by `GET /forms/{id}/responses/{rid}`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoredResponse {
    #[serde(default)]
    pub answers: serde_json::Map<String, serde_json::Value>,
}

/// Build the outgoing payload from raw input values.
///
/// Values are trimmed; empty values are omitted. Callers validate first,
/// so a number field that still fails to parse is skipped rather than
/// sent as text.
pub fn build_payload(fields: &[Field], values: &HashMap<FieldId, String>) -> Answers {
    let mut payload = Answers::new();
    for field in fields {
        let trimmed = values.get(&field.id).map(|v| v.trim()).unwrap_or_default();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(value) = AnswerValue::from_input(field.field_type, trimmed) {
            payload.insert(field.label.clone(), value);
        }
    }
    payload
}

/// Turn stored answers back into raw input values for the given fields.
///
/// Strings are kept verbatim; numbers and booleans are stringified; null
/// and missing answers leave the field untouched.
pub fn prefill_values(
    fields: &[Field],
    answers: &serde_json::Map<String, serde_json::Value>,
) -> HashMap<FieldId, String> {
    fields
        .iter()
        .filter_map(|field| {
            let shown = match answers.get(&field.label)? {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((field.id.clone(), shown))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> Vec<Field> {
        vec![
            Field::new("Name", FieldType::Text),
            Field::new("Age", FieldType::Number),
            Field::new("Notes", FieldType::Textarea),
        ]
    }

    #[test]
    fn test_payload_trims_types_and_omits_empty() {
        let fields = fields();
        let values: HashMap<FieldId, String> = [
            (fields[0].id.clone(), "  Alice ".to_string()),
            (fields[1].id.clone(), " 42 ".to_string()),
            (fields[2].id.clone(), "   ".to_string()),
        ]
        .into_iter()
        .collect();

        let payload = build_payload(&fields, &values);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"Name": "Alice", "Age": 42})
        );
    }

    #[test]
    fn test_fractional_numbers_stay_numbers() {
        assert_eq!(
            serde_json::to_value(AnswerValue::from_input(FieldType::Number, "12.5")).unwrap(),
            json!(12.5)
        );
        assert_eq!(AnswerValue::from_input(FieldType::Number, "12a"), None);
        assert_eq!(
            AnswerValue::from_input(FieldType::Date, "2024-01-01"),
            Some(AnswerValue::Text("2024-01-01".into()))
        );
    }

    #[test]
    fn test_payload_with_no_answers_is_empty() {
        let payload = build_payload(&fields(), &HashMap::new());
        assert!(payload.is_empty());
    }

    #[test]
    fn test_prefill_from_stored_answers() {
        let fields = fields();
        let stored = json!({"Name": "Alice", "Age": 30, "Notes": null, "Unknown": "x"});
        let values = prefill_values(&fields, stored.as_object().unwrap());
        assert_eq!(values.get(&fields[0].id).map(String::as_str), Some("Alice"));
        assert_eq!(values.get(&fields[1].id).map(String::as_str), Some("30"));
        assert!(!values.contains_key(&fields[2].id));
        assert_eq!(values.len(), 2);
    }
}
