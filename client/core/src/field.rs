//! Field model
//!
//! A form is an ordered list of labeled, typed fields. Each field carries a
//! [`FieldId`] assigned when it is created (or when it is first loaded
//! without one), so values and errors never depend on a field's position.

use crate::api::envelope::lenient_id;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable field identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    /// Assign a fresh identity
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wrap an identity issued elsewhere
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Read a field id, numeric or string; a null or empty one gets a fresh identity
fn field_id_or_fresh<'de, D>(deserializer: D) -> Result<FieldId, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_id(deserializer)?.map_or_else(FieldId::generate, FieldId))
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared field type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Date,
    Email,
    Textarea,
}

impl FieldType {
    /// All types, in builder menu order
    pub const ALL: [FieldType; 5] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Date,
        FieldType::Email,
        FieldType::Textarea,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Email => "email",
            FieldType::Textarea => "textarea",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("Unknown field type: {}", s.trim()))
    }
}

/// A single labeled input slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Identity; generated when the server omitted it
    #[serde(default = "FieldId::generate", deserialize_with = "field_id_or_fresh")]
    pub id: FieldId,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl Field {
    /// Create a field with a fresh identity
    pub fn new(label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: FieldId::generate(),
            label: label.into(),
            field_type,
        }
    }
}

/// A form as returned by `GET /forms/{id}`
///
/// Only `id` is read as the form's identity. Other id keys the service may
/// echo (`form_id`, `formId`) are ignored; the client fills `id` from the
/// requested path when it is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormDefinition {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl FormDefinition {
    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.id == id)
    }

    pub fn field_by_label(&self, label: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.label == label)
    }
}

/// Body of `POST /forms` and `PUT /forms/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct FormPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    pub fields: &'a [Field],
}
