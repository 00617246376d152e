//! Response sessions
//!
//! A [`ResponseSession`] is one person filling out one form. It keeps the
//! raw input exactly as typed, validates on blur and again on submit, and
//! drives a submission through
//!
//! ```text
//! Idle ─▶ Validating ─┬─▶ Invalid
//!                     └─▶ Submitting ─┬─▶ Succeeded
//!                                     └─▶ Failed
//! ```
//!
//! Values survive every transition, so a failed submit can be retried
//! without re-entering anything.

use crate::answers::{build_payload, prefill_values};
use crate::api::{FormsBackend, SubmitReceipt};
use crate::field::{Field, FieldId, FormDefinition};
use crate::link::EditLink;
use crate::validation::{validate, FieldErrors, ValidationError};
use crate::{FormsError, Result};
use std::collections::HashMap;

/// Whether submitting creates a response or overwrites one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    Create,
    Edit {
        response_id: String,
        edit_token: String,
    },
}

impl SessionMode {
    /// Edit mode only when both parts are present
    pub fn from_parts(response_id: Option<&str>, edit_token: Option<&str>) -> Self {
        match (response_id, edit_token) {
            (Some(id), Some(token)) if !id.is_empty() && !token.is_empty() => SessionMode::Edit {
                response_id: id.to_string(),
                edit_token: token.to_string(),
            },
            _ => SessionMode::Create,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, SessionMode::Edit { .. })
    }
}

/// Result of a successful submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted {
        receipt: SubmitReceipt,
        edit_link: Option<EditLink>,
    },
    Updated,
}

impl SubmitOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SubmitOutcome::Submitted { .. } => "Submitted successfully.",
            SubmitOutcome::Updated => "Response updated.",
        }
    }
}

/// Where a session is in the submission flow
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Invalid,
    Submitting,
    Succeeded(SubmitOutcome),
    Failed(String),
}

/// One form being filled out
#[derive(Debug, Clone)]
pub struct ResponseSession {
    form_id: String,
    title: Option<String>,
    fields: Vec<Field>,
    values: HashMap<FieldId, String>,
    errors: FieldErrors,
    mode: SessionMode,
    state: SubmissionState,
    edit_link: Option<EditLink>,
    link_base: Option<String>,
}

impl ResponseSession {
    /// Start a fresh response to `form`
    pub fn new(form_id: impl Into<String>, form: FormDefinition) -> Self {
        Self {
            form_id: form_id.into(),
            title: form.title,
            fields: form.fields,
            values: HashMap::new(),
            errors: FieldErrors::new(),
            mode: SessionMode::Create,
            state: SubmissionState::Idle,
            edit_link: None,
            link_base: None,
        }
    }

    /// Reopen a stored response; values are pre-filled from `answers`
    pub fn for_edit(
        form_id: impl Into<String>,
        form: FormDefinition,
        response_id: &str,
        edit_token: &str,
        answers: &serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        let mut session = Self::new(form_id, form);
        session.values = prefill_values(&session.fields, answers);
        session.mode = SessionMode::from_parts(Some(response_id), Some(edit_token));
        session
    }

    /// Base URL edit links are built under
    pub fn with_link_base(mut self, base: impl Into<String>) -> Self {
        self.link_base = Some(base.into());
        self
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        !self.is_submitting()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, id: &FieldId) -> Option<ValidationError> {
        self.errors.get(id)
    }

    /// The last edit link issued, if any
    pub fn edit_link(&self) -> Option<&EditLink> {
        self.edit_link.as_ref()
    }

    /// Raw value as typed, untrimmed
    pub fn value(&self, id: &FieldId) -> &str {
        self.values.get(id).map(String::as_str).unwrap_or_default()
    }

    pub fn set_value(&mut self, id: &FieldId, raw: impl Into<String>) -> Result<()> {
        self.field(id)?;
        self.values.insert(id.clone(), raw.into());
        Ok(())
    }

    /// Validate one field as it loses focus
    pub fn blur(&mut self, id: &FieldId) -> Result<Option<ValidationError>> {
        let field_type = self.field(id)?.field_type;
        let outcome = validate(field_type, self.value(id));
        self.errors.set(id.clone(), outcome);
        Ok(outcome)
    }

    /// Validate every field, recording all errors at once
    pub fn validate_all(&mut self) -> &FieldErrors {
        let mut errors = FieldErrors::new();
        for field in &self.fields {
            let raw = self.values.get(&field.id).map(String::as_str).unwrap_or_default();
            errors.set(field.id.clone(), validate(field.field_type, raw));
        }
        self.errors = errors;
        &self.errors
    }

    /// Submit, or in edit mode overwrite, the response.
    ///
    /// Nothing reaches the network unless every field validates. On any
    /// failure the entered values are kept.
    pub async fn submit(&mut self, backend: &dyn FormsBackend) -> Result<SubmitOutcome> {
        self.state = SubmissionState::Validating;

        if !self.validate_all().is_empty() {
            self.state = SubmissionState::Invalid;
            tracing::debug!(form_id = %self.form_id, errors = self.errors.len(), "submit blocked by validation");
            return Err(FormsError::Validation(self.errors.clone()));
        }

        let answers = build_payload(&self.fields, &self.values);
        self.state = SubmissionState::Submitting;

        let result = match &self.mode {
            SessionMode::Edit {
                response_id,
                edit_token,
            } => backend
                .update_response(&self.form_id, response_id, edit_token, &answers)
                .await
                .map(|()| SubmitOutcome::Updated),
            SessionMode::Create => backend
                .submit_form(&self.form_id, &answers)
                .await
                .map(|receipt| {
                    let edit_link = self.build_edit_link(&receipt);
                    SubmitOutcome::Submitted { receipt, edit_link }
                }),
        };

        match result {
            Ok(outcome) => {
                self.edit_link = match &outcome {
                    SubmitOutcome::Submitted { edit_link, .. } => edit_link.clone(),
                    SubmitOutcome::Updated => None,
                };
                self.state = SubmissionState::Succeeded(outcome.clone());
                Ok(outcome)
            }
            Err(err) => {
                self.state = SubmissionState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    fn build_edit_link(&self, receipt: &SubmitReceipt) -> Option<EditLink> {
        let (response_id, token) = receipt.edit_credentials()?;
        let base = self.link_base.as_deref()?;
        match EditLink::new(base, &self.form_id, response_id, token) {
            Ok(link) => Some(link),
            Err(e) => {
                tracing::warn!("Could not build edit link: {}", e);
                None
            }
        }
    }

    fn field(&self, id: &FieldId) -> Result<&Field> {
        self.fields
            .iter()
            .find(|f| &f.id == id)
            .ok_or_else(|| FormsError::Draft(format!("No field with id {}", id)))
    }
}

/// Load a stored response for editing.
///
/// The form and the response are fetched concurrently; both must load
/// before a session exists.
pub async fn load_edit_session(
    backend: &dyn FormsBackend,
    form_id: &str,
    response_id: &str,
    edit_token: &str,
) -> Result<ResponseSession> {
    if form_id.is_empty() || response_id.is_empty() || edit_token.is_empty() {
        return Err(FormsError::Config(
            "Missing form, response, or edit token.".to_string(),
        ));
    }

    let (form, stored) = tokio::try_join!(
        backend.get_form(form_id),
        backend.get_response(form_id, response_id, edit_token),
    )?;

    Ok(ResponseSession::for_edit(
        form_id,
        form,
        response_id,
        edit_token,
        &stored.answers,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::{Answers, StoredResponse};
    use crate::field::FieldType;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Submit(String, serde_json::Value),
        Update(String, String, String, serde_json::Value),
    }

    #[derive(Default)]
    struct FakeBackend {
        form: Option<FormDefinition>,
        stored: Option<serde_json::Value>,
        receipt: SubmitReceipt,
        fail_with: Option<(u16, String)>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeBackend {
        fn failure(&self) -> Result<()> {
            match &self.fail_with {
                Some((status, message)) => Err(FormsError::Api {
                    status: *status,
                    message: message.clone(),
                }),
                None => Ok(()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FormsBackend for FakeBackend {
        async fn create_form(&self, _title: Option<&str>, _fields: &[Field]) -> Result<String> {
            Ok("new-form".into())
        }

        async fn get_form(&self, _form_id: &str) -> Result<FormDefinition> {
            self.form.clone().ok_or(FormsError::Api {
                status: 404,
                message: "Form not found".into(),
            })
        }

        async fn update_form(&self, _: &str, _: Option<&str>, _: &[Field]) -> Result<()> {
            Ok(())
        }

        async fn submit_form(&self, form_id: &str, answers: &Answers) -> Result<SubmitReceipt> {
            self.failure()?;
            self.calls.lock().unwrap().push(Call::Submit(
                form_id.into(),
                serde_json::to_value(answers).unwrap(),
            ));
            Ok(self.receipt.clone())
        }

        async fn get_response(&self, _: &str, _: &str, _: &str) -> Result<StoredResponse> {
            let stored = self.stored.clone().ok_or(FormsError::Api {
                status: 403,
                message: "Invalid edit token".into(),
            })?;
            Ok(serde_json::from_value(stored).unwrap())
        }

        async fn update_response(
            &self,
            form_id: &str,
            response_id: &str,
            edit_token: &str,
            answers: &Answers,
        ) -> Result<()> {
            self.failure()?;
            self.calls.lock().unwrap().push(Call::Update(
                form_id.into(),
                response_id.into(),
                edit_token.into(),
                serde_json::to_value(answers).unwrap(),
            ));
            Ok(())
        }
    }

    fn contact_form() -> FormDefinition {
        FormDefinition {
            id: Some("f1".into()),
            title: Some("Contact".into()),
            fields: vec![
                Field::new("Name", FieldType::Text),
                Field::new("Age", FieldType::Number),
                Field::new("Email", FieldType::Email),
            ],
        }
    }

    #[tokio::test]
    async fn test_invalid_fields_block_the_network_call() {
        let backend = FakeBackend::default();
        let mut session = ResponseSession::new("f1", contact_form());
        let ids: Vec<FieldId> = session.fields().iter().map(|f| f.id.clone()).collect();
        session.set_value(&ids[0], "1abc").unwrap();
        session.set_value(&ids[1], "12a").unwrap();
        session.set_value(&ids[2], "a@b").unwrap();

        let err = session.submit(&backend).await.unwrap_err();
        match err {
            FormsError::Validation(errors) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(session.state(), &SubmissionState::Invalid);
        assert_eq!(session.error(&ids[1]), Some(ValidationError::InvalidNumber));
        assert!(backend.calls().is_empty());
        assert_eq!(session.value(&ids[0]), "1abc");
    }

    #[tokio::test]
    async fn test_submit_builds_payload_and_edit_link() {
        let backend = FakeBackend {
            receipt: SubmitReceipt {
                response_id: Some("r1".into()),
                edit_token: Some("tok".into()),
            },
            ..Default::default()
        };
        let mut session =
            ResponseSession::new("f1", contact_form()).with_link_base("https://forms.example.com");
        let ids: Vec<FieldId> = session.fields().iter().map(|f| f.id.clone()).collect();
        session.set_value(&ids[0], "  Alice ").unwrap();
        session.set_value(&ids[1], "30").unwrap();

        let outcome = session.submit(&backend).await.unwrap();
        assert_eq!(outcome.message(), "Submitted successfully.");
        assert_eq!(
            backend.calls(),
            vec![Call::Submit("f1".into(), json!({"Name": "Alice", "Age": 30}))]
        );
        assert_eq!(
            session.edit_link().map(EditLink::as_str),
            Some("https://forms.example.com/forms/f1/response/r1/edit?token=tok")
        );
        assert_eq!(session.value(&ids[0]), "  Alice ");
    }

    #[tokio::test]
    async fn test_no_link_without_both_credentials() {
        let backend = FakeBackend {
            receipt: SubmitReceipt {
                response_id: Some("r1".into()),
                edit_token: None,
            },
            ..Default::default()
        };
        let mut session =
            ResponseSession::new("f1", contact_form()).with_link_base("https://forms.example.com");
        session.submit(&backend).await.unwrap();
        assert!(session.edit_link().is_none());
    }

    #[tokio::test]
    async fn test_failure_keeps_values_for_retry() {
        let backend = FakeBackend {
            fail_with: Some((500, "Failed to submit form: (500)".into())),
            ..Default::default()
        };
        let mut session = ResponseSession::new("f1", contact_form());
        let name = session.fields()[0].id.clone();
        session.set_value(&name, "Bob").unwrap();

        let err = session.submit(&backend).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to submit form: (500)");
        assert_eq!(
            session.state(),
            &SubmissionState::Failed("Failed to submit form: (500)".into())
        );
        assert_eq!(session.value(&name), "Bob");
    }

    #[tokio::test]
    async fn test_submit_is_enabled_outside_of_a_request() {
        let mut session = ResponseSession::new("f1", contact_form());
        assert!(session.can_submit());

        let age = session.fields()[1].id.clone();
        session.set_value(&age, "many").unwrap();
        session.submit(&FakeBackend::default()).await.unwrap_err();
        assert_eq!(session.state(), &SubmissionState::Invalid);
        assert!(session.can_submit());

        session.set_value(&age, "40").unwrap();
        let failing = FakeBackend {
            fail_with: Some((503, "Failed to submit form: (503)".into())),
            ..Default::default()
        };
        session.submit(&failing).await.unwrap_err();
        assert!(session.can_submit());

        session.submit(&FakeBackend::default()).await.unwrap();
        assert!(matches!(session.state(), SubmissionState::Succeeded(_)));
        assert!(session.can_submit());
    }

    #[tokio::test]
    async fn test_blur_sets_and_clears_error() {
        let mut session = ResponseSession::new("f1", contact_form());
        let age = session.fields()[1].id.clone();
        session.set_value(&age, "abc").unwrap();
        assert_eq!(session.blur(&age).unwrap(), Some(ValidationError::InvalidNumber));
        session.set_value(&age, "").unwrap();
        assert_eq!(session.blur(&age).unwrap(), None);
        assert!(session.errors().is_empty());
    }

    #[tokio::test]
    async fn test_edit_flow_prefills_and_updates() {
        let form = FormDefinition {
            id: Some("f1".into()),
            title: None,
            fields: vec![Field::new("Name", FieldType::Text)],
        };
        let backend = FakeBackend {
            form: Some(form),
            stored: Some(json!({"answers": {"Name": "Alice"}})),
            ..Default::default()
        };

        let mut session = load_edit_session(&backend, "f1", "r1", "tok").await.unwrap();
        let name = session.fields()[0].id.clone();
        assert!(session.mode().is_edit());
        assert_eq!(session.value(&name), "Alice");

        session.set_value(&name, "Alice2").unwrap();
        let outcome = session.submit(&backend).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Updated);
        assert_eq!(outcome.message(), "Response updated.");
        assert!(session.edit_link().is_none());
        assert_eq!(
            backend.calls(),
            vec![Call::Update(
                "f1".into(),
                "r1".into(),
                "tok".into(),
                json!({"Name": "Alice2"})
            )]
        );
    }

    #[tokio::test]
    async fn test_edit_load_aborts_when_either_fetch_fails() {
        let backend = FakeBackend {
            form: Some(contact_form()),
            stored: None,
            ..Default::default()
        };
        let err = load_edit_session(&backend, "f1", "r1", "bad").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid edit token");

        let backend = FakeBackend {
            form: None,
            stored: Some(json!({"answers": {}})),
            ..Default::default()
        };
        let err = load_edit_session(&backend, "f1", "r1", "tok").await.unwrap_err();
        assert_eq!(err.to_string(), "Form not found");
    }

    #[tokio::test]
    async fn test_edit_load_requires_all_parts() {
        let backend = FakeBackend::default();
        let err = load_edit_session(&backend, "f1", "r1", "").await.unwrap_err();
        assert_eq!(err.to_string(), "Missing form, response, or edit token.");
    }

    #[test]
    fn test_mode_needs_both_parts() {
        assert_eq!(SessionMode::from_parts(Some("r1"), None), SessionMode::Create);
        assert_eq!(SessionMode::from_parts(Some("r1"), Some("")), SessionMode::Create);
        assert!(SessionMode::from_parts(Some("r1"), Some("t")).is_edit());
    }
}
