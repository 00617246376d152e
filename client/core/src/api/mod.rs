//! Forms API client
//!
//! Thin HTTP client for the external forms service:
//!
//! | call | route |
//! |---|---|
//! | create form | `POST {base}/forms` |
//! | get form | `GET {base}/forms/{id}` |
//! | update form | `PUT {base}/forms/{id}` |
//! | submit | `POST {base}/submit/{id}` |
//! | get response | `GET {base}/forms/{id}/responses/{rid}?token=` |
//! | update response | `PUT {base}/forms/{id}/responses/{rid}` |

pub mod envelope;

use crate::answers::{Answers, StoredResponse};
use crate::config::ClientConfig;
use crate::field::{Field, FormDefinition, FormPayload};
use crate::{FormsError, Result};
use async_trait::async_trait;
use reqwest::{header, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

pub use envelope::{extract_error_message, normalize_form_id, FormIdLookup};

/// User agent sent with every request
const CLIENT_AGENT: &str = concat!("formdesk/", env!("CARGO_PKG_VERSION"));

/// What `POST /submit/{id}` hands back
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmitReceipt {
    #[serde(default, deserialize_with = "envelope::lenient_id")]
    pub response_id: Option<String>,
    #[serde(default, deserialize_with = "envelope::lenient_id")]
    pub edit_token: Option<String>,
}

impl SubmitReceipt {
    /// Both parts needed to come back and edit, if the server issued them
    pub fn edit_credentials(&self) -> Option<(&str, &str)> {
        match (self.response_id.as_deref(), self.edit_token.as_deref()) {
            (Some(id), Some(token)) if !id.is_empty() && !token.is_empty() => Some((id, token)),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct UpdateResponseBody<'a> {
    edit_token: &'a str,
    answers: &'a Answers,
}

/// Operations the builder and renderer need from the forms service
#[async_trait]
pub trait FormsBackend: Send + Sync {
    /// Create a form, returning its id
    async fn create_form(&self, title: Option<&str>, fields: &[Field]) -> Result<String>;

    /// Fetch a form definition
    async fn get_form(&self, form_id: &str) -> Result<FormDefinition>;

    /// Replace a form's title and fields
    async fn update_form(&self, form_id: &str, title: Option<&str>, fields: &[Field]) -> Result<()>;

    /// Submit a new response
    async fn submit_form(&self, form_id: &str, answers: &Answers) -> Result<SubmitReceipt>;

    /// Fetch a stored response with its edit token
    async fn get_response(
        &self,
        form_id: &str,
        response_id: &str,
        edit_token: &str,
    ) -> Result<StoredResponse>;

    /// Overwrite a stored response
    async fn update_response(
        &self,
        form_id: &str,
        response_id: &str,
        edit_token: &str,
        answers: &Answers,
    ) -> Result<()>;
}

/// HTTP implementation of [`FormsBackend`]
#[derive(Debug, Clone)]
pub struct FormsApi {
    inner: Arc<FormsApiInner>,
}

#[derive(Debug)]
struct FormsApiInner {
    config: ClientConfig,
    http: reqwest::Client,
}

impl FormsApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(CLIENT_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(FormsApiInner { config, http }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.inner.config.base_url)?;
        url.path_segments_mut()
            .map_err(|_| FormsError::Config(format!("Invalid API URL: {}", self.inner.config.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send one request; non-2xx becomes [`FormsError::Api`] built from
    /// the body with `fallback` as the default phrase.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        fallback: &str,
    ) -> Result<String> {
        tracing::debug!(%method, %url, "forms api request");

        let mut request = self.inner.http.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            return Ok(text);
        }

        let message = extract_error_message(status, &text, fallback);
        tracing::warn!(%method, %url, status = status.as_u16(), %message, "forms api call failed");
        Err(FormsError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        fallback: &str,
    ) -> Result<T> {
        let text = self.send(method, url, body, fallback).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl FormsBackend for FormsApi {
    async fn create_form(&self, title: Option<&str>, fields: &[Field]) -> Result<String> {
        let url = self.url(&["forms"])?;
        let payload = FormPayload { title, fields };
        let body: serde_json::Value = self
            .send_json(Method::POST, url, Some(&payload), "Failed to create form")
            .await?;

        match normalize_form_id(&body) {
            FormIdLookup::Found(id) => {
                tracing::info!(form_id = %id, fields = fields.len(), "form created");
                Ok(id)
            }
            FormIdLookup::NotFound => {
                tracing::warn!(%body, "create form response carried no form id");
                Err(FormsError::MissingFormId(
                    envelope::body_message(&body)
                        .unwrap_or_else(|| "Invalid response: missing form id".to_string()),
                ))
            }
        }
    }

    async fn get_form(&self, form_id: &str) -> Result<FormDefinition> {
        let url = self.url(&["forms", form_id])?;
        let mut form: FormDefinition = self
            .send_json(Method::GET, url, None::<&()>, "Form not found")
            .await?;
        if form.id.is_none() {
            form.id = Some(form_id.to_string());
        }
        Ok(form)
    }

    async fn update_form(&self, form_id: &str, title: Option<&str>, fields: &[Field]) -> Result<()> {
        let url = self.url(&["forms", form_id])?;
        let payload = FormPayload { title, fields };
        self.send(Method::PUT, url, Some(&payload), "Failed to update form")
            .await?;
        tracing::info!(%form_id, fields = fields.len(), "form updated");
        Ok(())
    }

    async fn submit_form(&self, form_id: &str, answers: &Answers) -> Result<SubmitReceipt> {
        let url = self.url(&["submit", form_id])?;
        let text = self
            .send(Method::POST, url, Some(answers), "Failed to submit form")
            .await?;
        // An empty body means no edit credentials were issued
        let receipt = if text.trim().is_empty() {
            SubmitReceipt::default()
        } else {
            serde_json::from_str(&text)?
        };
        tracing::info!(%form_id, response_id = ?receipt.response_id, "response submitted");
        Ok(receipt)
    }

    async fn get_response(
        &self,
        form_id: &str,
        response_id: &str,
        edit_token: &str,
    ) -> Result<StoredResponse> {
        let mut url = self.url(&["forms", form_id, "responses", response_id])?;
        url.query_pairs_mut().append_pair("token", edit_token);
        self.send_json(Method::GET, url, None::<&()>, "Failed to load response")
            .await
    }

    async fn update_response(
        &self,
        form_id: &str,
        response_id: &str,
        edit_token: &str,
        answers: &Answers,
    ) -> Result<()> {
        let url = self.url(&["forms", form_id, "responses", response_id])?;
        let body = UpdateResponseBody { edit_token, answers };
        self.send(Method::PUT, url, Some(&body), "Failed to update response")
            .await?;
        tracing::info!(%form_id, %response_id, "response updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_joined_under_base_path() {
        let api = FormsApi::new(ClientConfig::new("https://api.example.com/prod/").unwrap()).unwrap();
        let url = api.url(&["forms", "a/b"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/prod/forms/a%2Fb");
    }

    #[test]
    fn test_receipt_needs_both_credentials() {
        let full = SubmitReceipt {
            response_id: Some("r1".into()),
            edit_token: Some("t".into()),
        };
        assert_eq!(full.edit_credentials(), Some(("r1", "t")));
        let partial = SubmitReceipt {
            response_id: Some("r1".into()),
            edit_token: None,
        };
        assert_eq!(partial.edit_credentials(), None);
    }

    #[test]
    fn test_receipt_accepts_numeric_ids() {
        let receipt: SubmitReceipt =
            serde_json::from_str(r#"{"response_id":42,"edit_token":"t","extra":true}"#).unwrap();
        assert_eq!(receipt.edit_credentials(), Some(("42", "t")));

        let receipt: SubmitReceipt =
            serde_json::from_str(r#"{"response_id":null,"edit_token":"t"}"#).unwrap();
        assert_eq!(receipt.response_id, None);
    }
}
