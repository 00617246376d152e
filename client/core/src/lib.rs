//! Formdesk Client - Form building and response submission
//!
//! Client side of a simple forms service: design a form from labeled,
//! typed fields, fill it out, and submit or later edit the response.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     FORMDESK CLIENT CORE                     │
//! │                                                              │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐  │
//! │  │  FormDraft   │   │   Response   │   │    Validator     │  │
//! │  │  (builder)   │   │   Session    │──▶│ (type → rule)    │  │
//! │  └──────┬───────┘   └──────┬───────┘   └──────────────────┘  │
//! │         │                  │                                 │
//! │  ┌──────▼──────────────────▼───────┐   ┌──────────────────┐  │
//! │  │      FormsBackend (FormsApi)    │──▶│ Envelope shims   │  │
//! │  │   reqwest, one call per action  │   │ (id, errors)     │  │
//! │  └─────────────────────────────────┘   └──────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod answers;
pub mod api;
pub mod builder;
pub mod config;
pub mod field;
pub mod link;
pub mod session;
pub mod validation;

use thiserror::Error;

pub use answers::{AnswerValue, Answers, StoredResponse};
pub use api::{FormIdLookup, FormsApi, FormsBackend, SubmitReceipt};
pub use builder::FormDraft;
pub use config::ClientConfig;
pub use field::{Field, FieldId, FieldType, FormDefinition};
pub use link::EditLink;
pub use session::{load_edit_session, ResponseSession, SessionMode, SubmissionState, SubmitOutcome};
pub use validation::{validate, FieldErrors, ValidationError};

/// Client error types
///
/// `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum FormsError {
    /// Missing or unusable configuration; nothing was sent
    #[error("{0}")]
    Config(String),
    /// One or more fields failed validation; nothing was sent
    #[error("{0}")]
    Validation(FieldErrors),
    /// The API answered with a non-2xx status
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },
    /// Form creation succeeded but no id could be found in the reply
    #[error("{0}")]
    MissingFormId(String),
    /// The form draft cannot be saved as is
    #[error("{0}")]
    Draft(String),
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// Malformed JSON body
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Bad URL
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Result alias for client operations
pub type Result<T> = std::result::Result<T, FormsError>;
