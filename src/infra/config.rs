// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: String,
    /// Model the remote agent runs with. Sent verbatim as `llm`.
    pub llm: String,
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: crate::remote::DEFAULT_BASE_URL.into(),
            llm: crate::remote::DEFAULT_LLM.into(),
            request_timeout_secs: 30,
        }
    }
}

impl RemoteConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u64,
    pub max_wait_ms: u64,
    pub max_interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 3_000,
            max_wait_ms: 300_000,
            max_interval_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_chats: usize,
    pub max_recipes: usize,
    pub max_purchases: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_chats: 50,
            max_recipes: 100,
            max_purchases: 50,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.polling.interval_ms == 0 {
            anyhow::bail!("polling.interval_ms must be greater than zero");
        }
        if self.polling.max_interval_ms < self.polling.interval_ms {
            anyhow::bail!(
                "polling.max_interval_ms ({}) is below polling.interval_ms ({})",
                self.polling.max_interval_ms,
                self.polling.interval_ms
            );
        }
        if self.remote.base_url.trim().is_empty() {
            anyhow::bail!("remote.base_url must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.remote.llm, "gemini-2.5-flash");
        assert_eq!(c.polling.interval_ms, 3_000);
        assert_eq!(c.polling.max_wait_ms, 300_000);
        assert_eq!(c.polling.max_interval_ms, 10_000);
        assert_eq!(c.retry.max_retries, 2);
        assert_eq!(c.retry.base_delay_ms, 2_000);
        assert_eq!(c.history.max_chats, 50);
        assert_eq!(c.history.max_recipes, 100);
        assert_eq!(c.history.max_purchases, 50);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.polling.interval_ms, 3_000);
        assert_eq!(config.remote.base_url, "https://api.browser-use.com/api/v2");
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[remote]
base_url = "http://localhost:8080/api/v2"
llm = "gpt-4.1-mini"
request_timeout_secs = 10

[polling]
interval_ms = 1000
max_wait_ms = 60000
max_interval_ms = 5000

[retry]
max_retries = 4
base_delay_ms = 500

[history]
max_chats = 5
max_recipes = 10
max_purchases = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.remote.llm, "gpt-4.1-mini");
        assert_eq!(config.remote.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.polling.max_wait_ms, 60_000);
        assert_eq!(config.retry.max_retries, 4);
        assert_eq!(config.history.max_recipes, 10);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str("[polling]\ninterval_ms = 1000\n").unwrap();
        assert_eq!(config.polling.interval_ms, 1_000);
        assert_eq!(config.polling.max_wait_ms, 300_000);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut c = Config::default();
        c.polling.interval_ms = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_intervals() {
        let mut c = Config::default();
        c.polling.max_interval_ms = 1_000;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.polling.max_wait_ms, config.polling.max_wait_ms);
        assert_eq!(deserialized.remote.llm, config.remote.llm);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }
}
