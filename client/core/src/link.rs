//! Edit-my-response links
//!
//! Shape: `{app}/forms/{form_id}/response/{response_id}/edit?token={token}`

use crate::{FormsError, Result};
use percent_encoding::percent_decode_str;
use std::fmt;
use url::Url;

/// A durable link that reopens a response for editing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditLink {
    pub form_id: String,
    pub response_id: String,
    pub edit_token: String,
    url: Url,
}

impl EditLink {
    pub fn new(app_url: &str, form_id: &str, response_id: &str, edit_token: &str) -> Result<Self> {
        let mut url = Url::parse(app_url.trim_end_matches('/'))?;
        url.path_segments_mut()
            .map_err(|_| FormsError::Config(format!("App URL cannot hold a path: {}", app_url)))?
            .pop_if_empty()
            .extend(["forms", form_id, "response", response_id, "edit"]);
        url.query_pairs_mut().append_pair("token", edit_token);

        Ok(Self {
            form_id: form_id.to_string(),
            response_id: response_id.to_string(),
            edit_token: edit_token.to_string(),
            url,
        })
    }

    /// Recover the ids and token from a pasted link
    pub fn parse(link: &str) -> Result<Self> {
        let url = Url::parse(link.trim())?;
        let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();

        let tail = segments
            .windows(5)
            .rev()
            .find(|w| w[0] == "forms" && w[2] == "response" && w[4] == "edit")
            .ok_or_else(|| FormsError::Config(format!("Not an edit link: {}", link.trim())))?;
        let token = url
            .query_pairs()
            .find(|(k, _)| k == "token")
            .map(|(_, v)| v.into_owned())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| FormsError::Config("Edit link has no token".to_string()))?;

        let form_id = decode_segment(tail[1])?;
        let response_id = decode_segment(tail[3])?;

        Ok(Self {
            form_id,
            response_id,
            edit_token: token,
            url,
        })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for EditLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Undo path-segment encoding. Only `%XX` escapes are special here.
fn decode_segment(segment: &str) -> Result<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| FormsError::Config(format!("Edit link segment is not UTF-8: {}", segment)))
}
