//! CLI Commands

pub mod config;
pub mod forms;
pub mod responses;

use anyhow::{anyhow, Context, Result};
use formdesk_client::{ClientConfig, FieldType, FormsApi};
use std::time::Duration;

/// Connection settings after flags, environment and profile are merged
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub api_url: Option<String>,
    pub app_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Build the API client; fails before any request when no URL is set
    pub fn client(&self) -> Result<FormsApi> {
        let mut config = ClientConfig::new(self.api_url.as_deref().unwrap_or_default())?
            .with_app_url(self.app_url.as_deref());
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(FormsApi::new(config)?)
    }
}

/// Parse a `Label:type` field spec
pub fn parse_field_spec(spec: &str) -> Result<(String, FieldType)> {
    let (label, kind) = spec
        .rsplit_once(':')
        .ok_or_else(|| anyhow!("Field must look like Label:type, got {:?}", spec))?;
    let label = label.trim();
    if label.is_empty() {
        return Err(anyhow!("Field label is empty in {:?}", spec));
    }
    let kind = kind.parse::<FieldType>().map_err(|e| anyhow!(e))?;
    Ok((label.to_string(), kind))
}

/// Parse a `Label=value` answer; the value is kept untrimmed
pub fn parse_answer(arg: &str) -> Result<(String, String)> {
    let (label, value) = arg
        .split_once('=')
        .with_context(|| format!("Answer must look like Label=value, got {:?}", arg))?;
    Ok((label.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_spec() {
        assert_eq!(
            parse_field_spec("Start date:date").unwrap(),
            ("Start date".to_string(), FieldType::Date)
        );
        assert_eq!(
            parse_field_spec("Time: 10:30:text").unwrap(),
            ("Time: 10:30".to_string(), FieldType::Text)
        );
        assert!(parse_field_spec("Name").is_err());
        assert!(parse_field_spec(":text").is_err());
        assert!(parse_field_spec("Name:checkbox").is_err());
    }

    #[test]
    fn test_answer() {
        assert_eq!(
            parse_answer("Note=a=b ").unwrap(),
            ("Note".to_string(), "a=b ".to_string())
        );
        assert!(parse_answer("Note").is_err());
    }

    #[test]
    fn test_client_requires_api_url() {
        let err = Settings::default().client().unwrap_err();
        assert!(err.to_string().contains("API URL is not configured"));
    }
}
