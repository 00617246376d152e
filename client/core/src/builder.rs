//! Form builder draft
//!
//! Holds the fields being designed until they are saved. A draft either
//! creates a new form or, when opened from an existing one, replaces it.

use crate::api::FormsBackend;
use crate::field::{Field, FieldId, FieldType, FormDefinition};
use crate::{FormsError, Result};
use std::collections::HashSet;

/// A form under construction
#[derive(Debug, Clone, Default)]
pub struct FormDraft {
    form_id: Option<String>,
    title: Option<String>,
    fields: Vec<Field>,
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an existing form for editing
    pub fn from_form(form_id: impl Into<String>, form: FormDefinition) -> Self {
        Self {
            form_id: Some(form_id.into()),
            title: form.title.filter(|t| !t.trim().is_empty()),
            fields: form.fields,
        }
    }

    pub fn form_id(&self) -> Option<&str> {
        self.form_id.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        self.title = (!title.trim().is_empty()).then_some(title);
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Append a field, returning its new identity
    pub fn add_field(&mut self, label: impl Into<String>, field_type: FieldType) -> FieldId {
        let field = Field::new(label, field_type);
        let id = field.id.clone();
        self.fields.push(field);
        id
    }

    pub fn set_label(&mut self, id: &FieldId, label: impl Into<String>) -> Result<()> {
        self.field_mut(id)?.label = label.into();
        Ok(())
    }

    pub fn set_type(&mut self, id: &FieldId, field_type: FieldType) -> Result<()> {
        self.field_mut(id)?.field_type = field_type;
        Ok(())
    }

    pub fn remove_field(&mut self, id: &FieldId) -> Result<Field> {
        let index = self.index_of(id)?;
        Ok(self.fields.remove(index))
    }

    /// Move a field to `to`, clamped to the end of the list
    pub fn move_field(&mut self, id: &FieldId, to: usize) -> Result<()> {
        let from = self.index_of(id)?;
        let field = self.fields.remove(from);
        let to = to.min(self.fields.len());
        self.fields.insert(to, field);
        Ok(())
    }

    pub fn find_by_label(&self, label: &str) -> Option<&FieldId> {
        self.fields.iter().find(|f| f.label == label).map(|f| &f.id)
    }

    /// Check the draft can be saved.
    ///
    /// Answers are keyed by label, so labels must be present and unique.
    pub fn check(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(FormsError::Draft("A form needs at least one field.".into()));
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            let label = field.label.trim();
            if label.is_empty() {
                return Err(FormsError::Draft("Every field needs a label.".into()));
            }
            if !seen.insert(label) {
                return Err(FormsError::Draft(format!(
                    "Field labels must be unique: {}",
                    label
                )));
            }
        }
        Ok(())
    }

    /// Save the draft, returning the form id
    pub async fn save(&mut self, backend: &dyn FormsBackend) -> Result<String> {
        self.check()?;
        for field in &mut self.fields {
            field.label = field.label.trim().to_string();
        }

        match &self.form_id {
            Some(id) => {
                backend
                    .update_form(id, self.title.as_deref(), &self.fields)
                    .await?;
                Ok(id.clone())
            }
            None => {
                let id = backend.create_form(self.title.as_deref(), &self.fields).await?;
                self.form_id = Some(id.clone());
                Ok(id)
            }
        }
    }

    fn index_of(&self, id: &FieldId) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| &f.id == id)
            .ok_or_else(|| FormsError::Draft(format!("No field with id {}", id)))
    }

    fn field_mut(&mut self, id: &FieldId) -> Result<&mut Field> {
        let index = self.index_of(id)?;
        Ok(&mut self.fields[index])
    }
}
