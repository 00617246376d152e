//! Client configuration

use crate::{FormsError, Result};
use std::time::Duration;

/// Environment variable holding the forms API base URL
pub const API_URL_ENV: &str = "FORMDESK_API_URL";
/// Environment variable holding the public app URL used in edit links
pub const APP_URL_ENV: &str = "FORMDESK_APP_URL";
/// Environment variable overriding the request timeout, in seconds
pub const TIMEOUT_ENV: &str = "FORMDESK_TIMEOUT_SECS";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Forms API base URL, without trailing slash
    pub base_url: String,
    /// Where the form pages are served; edit links are built under it
    pub app_url: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a config for `base_url`.
    ///
    /// A missing base URL is fatal: nothing may be sent without one.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_url(base_url).ok_or_else(|| {
            FormsError::Config(format!(
                "API URL is not configured. Set {} or pass --api-url.",
                API_URL_ENV
            ))
        })?;
        url::Url::parse(&base_url)?;

        Ok(Self {
            base_url,
            app_url: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set the public app URL
    pub fn with_app_url(mut self, app_url: Option<&str>) -> Self {
        self.app_url = app_url.and_then(normalize_url);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from `FORMDESK_*` environment variables
    pub fn from_env() -> Result<Self> {
        let base = std::env::var(API_URL_ENV).unwrap_or_default();
        let app = std::env::var(APP_URL_ENV).ok();
        let mut config = Self::new(&base)?.with_app_url(app.as_deref());

        if let Ok(secs) = std::env::var(TIMEOUT_ENV) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                FormsError::Config(format!("{} must be a whole number of seconds", TIMEOUT_ENV))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Base for edit links, falling back to the API base
    pub fn link_base(&self) -> &str {
        self.app_url.as_deref().unwrap_or(&self.base_url)
    }
}

fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_base_url_is_a_config_error() {
        let err = ClientConfig::new("  ").unwrap_err();
        assert!(matches!(err, FormsError::Config(_)));
        assert!(err.to_string().contains("API URL is not configured"));
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let config = ClientConfig::new("https://api.example.com/prod/").unwrap();
        assert_eq!(config.base_url, "https://api.example.com/prod");
        assert_eq!(config.link_base(), "https://api.example.com/prod");
    }

    #[test]
    fn test_app_url_overrides_link_base() {
        let config = ClientConfig::new("https://api.example.com")
            .unwrap()
            .with_app_url(Some("https://forms.example.com/"));
        assert_eq!(config.link_base(), "https://forms.example.com");
        let blank = ClientConfig::new("https://api.example.com")
            .unwrap()
            .with_app_url(Some(""));
        assert_eq!(blank.app_url, None);
    }

    #[test]
    fn test_unparsable_base_url_is_rejected() {
        assert!(ClientConfig::new("api.example.com").is_err());
    }
}
