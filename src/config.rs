use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "crypto-news";

/// News categories for filtering the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    #[default]
    All,
    Bitcoin,
    Ethereum,
}

impl NewsCategory {
    pub const ALL: [NewsCategory; 3] = [
        NewsCategory::All,
        NewsCategory::Bitcoin,
        NewsCategory::Ethereum,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            NewsCategory::All => "All",
            NewsCategory::Bitcoin => "Bitcoin",
            NewsCategory::Ethereum => "Ethereum",
        }
    }

    /// Search term sent to the news service.
    pub fn query(&self) -> &'static str {
        match self {
            NewsCategory::All => "crypto",
            NewsCategory::Bitcoin => "bitcoin",
            NewsCategory::Ethereum => "ethereum",
        }
    }

    pub fn next(&self) -> NewsCategory {
        match self {
            NewsCategory::All => NewsCategory::Bitcoin,
            NewsCategory::Bitcoin => NewsCategory::Ethereum,
            NewsCategory::Ethereum => NewsCategory::All,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub default_category: NewsCategory,
}

fn default_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_language() -> String {
    "en".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            page_size: default_page_size(),
            language: default_language(),
            request_timeout_secs: default_request_timeout(),
            default_category: NewsCategory::default(),
        }
    }
}

/// Per-user directory for persisted state and logs.
pub fn data_dir() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?
        .join(APP_DIR);

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(APP_DIR);

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        Ok(config_dir.join("config.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path)?;
        let mut config: Config = serde_json::from_str(&content)?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Repair values a hand-edited file may have broken.
    pub fn normalize(&mut self) {
        if self.page_size == 0 {
            self.page_size = default_page_size();
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_request_timeout();
        }
        if self.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            self.api_key = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_drops_blank_api_key() {
        let mut config = Config {
            api_key: Some("   ".to_string()),
            ..Config::default()
        };
        config.normalize();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn normalize_restores_zero_values() {
        let mut config = Config {
            page_size: 0,
            request_timeout_secs: 0,
            ..Config::default()
        };
        config.normalize();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.request_timeout_secs, 15);
    }
}
