//! Field validation
//!
//! Maps a field's declared type to a rule over the trimmed input. Empty
//! input is never an error here; required-ness is the caller's concern.

use crate::field::{FieldId, FieldType};
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

/// Why a value was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationError {
    InvalidNumber,
    InvalidDate,
    InvalidEmail,
    MustStartWithLetter,
}

impl ValidationError {
    /// User-facing message
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::InvalidNumber => "Must be a valid number.",
            ValidationError::InvalidDate => "Must be a valid date (e.g. YYYY-MM-DD).",
            ValidationError::InvalidEmail => "Must be a valid email address.",
            ValidationError::MustStartWithLetter => "Must start with a letter.",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

/// Validate a raw input against a field type.
///
/// Pure and idempotent: the same input always yields the same answer, so
/// it is safe to call on every blur and again at submit time.
pub fn validate(field_type: FieldType, raw: &str) -> Option<ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    match field_type {
        FieldType::Number => parse_number(trimmed)
            .is_none()
            .then_some(ValidationError::InvalidNumber),
        FieldType::Date => (!is_calendar_date(trimmed)).then_some(ValidationError::InvalidDate),
        FieldType::Email => {
            let matches = email_pattern().is_some_and(|re| re.is_match(trimmed));
            (!matches).then_some(ValidationError::InvalidEmail)
        }
        FieldType::Text | FieldType::Textarea => {
            let starts_with_letter = trimmed
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic());
            (!starts_with_letter).then_some(ValidationError::MustStartWithLetter)
        }
    }
}

/// Parse a trimmed number, rejecting NaN and infinities
pub fn parse_number(trimmed: &str) -> Option<f64> {
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_calendar_date(trimmed: &str) -> bool {
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(trimmed).is_ok()
}

/// Per-field errors collected in one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FieldId, ValidationError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for one field, clearing any earlier error
    pub fn set(&mut self, id: FieldId, outcome: Option<ValidationError>) {
        match outcome {
            Some(err) => {
                self.0.insert(id, err);
            }
            None => {
                self.0.remove(&id);
            }
        }
    }

    pub fn get(&self, id: &FieldId) -> Option<ValidationError> {
        self.0.get(id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &ValidationError)> {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.len() {
            1 => write!(f, "1 field is invalid"),
            n => write!(f, "{} fields are invalid", n),
        }
    }
}
