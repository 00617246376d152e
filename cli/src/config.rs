//! CLI Configuration
//!
//! Profiles live in `~/.formdesk/config.toml` (or `config.<profile>.toml`).
//! Command-line flags and `FORMDESK_*` variables take precedence.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Keys accepted by `formdesk config set/get`
pub const KEYS: [&str; 4] = ["api_url", "app_url", "timeout_secs", "default_format"];

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub app_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub default_format: Option<String>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self> {
        Self::load_from(&Self::config_path(profile)?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf> {
        let path = Self::config_path(profile)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let cleared = value.is_empty();
        match key {
            "api_url" => self.api_url = (!cleared).then(|| value.to_string()),
            "app_url" => self.app_url = (!cleared).then(|| value.to_string()),
            "timeout_secs" => {
                self.timeout_secs = if cleared {
                    None
                } else {
                    Some(value.parse().map_err(|_| anyhow!("timeout_secs must be a whole number"))?)
                }
            }
            "default_format" => {
                if !cleared && crate::output::OutputFormat::parse(value).is_none() {
                    bail!("default_format must be one of table, json, yaml");
                }
                self.default_format = (!cleared).then(|| value.to_string());
            }
            _ => bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(match key {
            "api_url" => self.api_url.clone(),
            "app_url" => self.app_url.clone(),
            "timeout_secs" => self.timeout_secs.map(|s| s.to_string()),
            "default_format" => self.default_format.clone(),
            _ => bail!("Unknown config key: {}", key),
        })
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot find home directory"))?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".formdesk").join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("api_url", "https://api.example.com").unwrap();
        config.set("timeout_secs", "5").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.get("timeout_secs").unwrap().as_deref(), Some("5"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("colour", "red").is_err());
        assert!(config.set("timeout_secs", "soon").is_err());
        assert!(config.set("default_format", "xml").is_err());
        config.set("default_format", "json").unwrap();
        config.set("default_format", "").unwrap();
        assert_eq!(config.default_format, None);
    }
}
