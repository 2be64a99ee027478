use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use anyhow::{Context, Result};

/// Settings read from `<config dir>/openfema/config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// API root to query instead of the public openFEMA host
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    /// Directory exports land in when no output path is given
    pub export_dir: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().context("Could not find config directory")?;
        path.push("openfema");
        path.push("config.toml");
        Ok(path)
    }

    pub fn export_dir(&self) -> PathBuf {
        PathBuf::from(self.export_dir.as_deref().unwrap_or("exports"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = Config::parse("base_url = \"http://localhost:9000/api/open\"\n").unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000/api/open"));
        assert_eq!(config.user_agent, None);
        assert_eq!(config.export_dir(), PathBuf::from("exports"));
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_rejects_bad_types() {
        assert!(Config::parse("export_dir = 5").is_err());
    }
}
