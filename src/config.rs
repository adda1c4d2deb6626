use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::indicator::params::IndicatorParams;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub kite: KiteConfig,
    pub news: NewsConfig,
    pub shipping: ShippingConfig,
    #[serde(default)]
    pub indicators: IndicatorParams,
    pub ui: UiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub api_keys: ApiKeys,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KiteConfig {
    pub rest_base_url: String,
    pub ws_url: String,
    pub login_url: String,
    pub exchange: String,
    pub history_days: i64,
    pub history_interval: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShippingConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    pub tick_history_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub watchlist_path: PathBuf,
    pub env_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Credentials for every upstream service. Never read from the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiKeys {
    pub kite_api_key: String,
    pub kite_api_secret: String,
    pub kite_access_token: String,
    pub fundamentals_api_key: String,
    pub news_api_key: String,
    pub shipping_api_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyField {
    KiteApiKey,
    KiteApiSecret,
    KiteAccessToken,
    FundamentalsApiKey,
    NewsApiKey,
    ShippingApiKey,
}

impl ApiKeyField {
    pub const ALL: [ApiKeyField; 6] = [
        ApiKeyField::KiteApiKey,
        ApiKeyField::KiteApiSecret,
        ApiKeyField::KiteAccessToken,
        ApiKeyField::FundamentalsApiKey,
        ApiKeyField::NewsApiKey,
        ApiKeyField::ShippingApiKey,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ApiKeyField::KiteApiKey => "Kite API Key",
            ApiKeyField::KiteApiSecret => "Kite API Secret",
            ApiKeyField::KiteAccessToken => "Kite Access Token",
            ApiKeyField::FundamentalsApiKey => "Fundamentals API Key",
            ApiKeyField::NewsApiKey => "News API Key",
            ApiKeyField::ShippingApiKey => "Shipping API Key",
        }
    }

    pub fn env_var(self) -> &'static str {
        match self {
            ApiKeyField::KiteApiKey => "KITE_API_KEY",
            ApiKeyField::KiteApiSecret => "KITE_API_SECRET",
            ApiKeyField::KiteAccessToken => "KITE_ACCESS_TOKEN",
            ApiKeyField::FundamentalsApiKey => "FUNDAMENTALS_API_KEY",
            ApiKeyField::NewsApiKey => "NEWS_API_KEY",
            ApiKeyField::ShippingApiKey => "SHIPPING_API_KEY",
        }
    }
}

impl ApiKeys {
    /// Missing variables become empty strings; the dashboard still starts.
    pub fn from_env() -> Self {
        let mut keys = ApiKeys::default();
        for field in ApiKeyField::ALL {
            let value = std::env::var(field.env_var()).unwrap_or_default();
            keys.set(field, value);
        }
        keys
    }

    pub fn get(&self, field: ApiKeyField) -> &str {
        match field {
            ApiKeyField::KiteApiKey => &self.kite_api_key,
            ApiKeyField::KiteApiSecret => &self.kite_api_secret,
            ApiKeyField::KiteAccessToken => &self.kite_access_token,
            ApiKeyField::FundamentalsApiKey => &self.fundamentals_api_key,
            ApiKeyField::NewsApiKey => &self.news_api_key,
            ApiKeyField::ShippingApiKey => &self.shipping_api_key,
        }
    }

    pub fn set(&mut self, field: ApiKeyField, value: String) {
        let slot = match field {
            ApiKeyField::KiteApiKey => &mut self.kite_api_key,
            ApiKeyField::KiteApiSecret => &mut self.kite_api_secret,
            ApiKeyField::KiteAccessToken => &mut self.kite_access_token,
            ApiKeyField::FundamentalsApiKey => &mut self.fundamentals_api_key,
            ApiKeyField::NewsApiKey => &mut self.news_api_key,
            ApiKeyField::ShippingApiKey => &mut self.shipping_api_key,
        };
        *slot = value.trim().to_string();
    }

    pub fn has_access_token(&self) -> bool {
        !self.kite_access_token.is_empty()
    }
}

/// Mask a secret for display, keeping the last four characters.
pub fn mask_secret(value: &str) -> String {
    if value.is_empty() {
        return "(not set)".to_string();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

/// Append `NAME="value"` to a dotenv file, creating it when missing.
pub fn append_env_var(path: &Path, name: &str, value: &str) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    writeln!(file, "{}=\"{}\"", name, value)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from_path(Path::new("config/default.toml"))
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let mut config = Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config.api_keys = ApiKeys::from_env();
        Ok(config)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str).context("invalid config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.ui.tick_history_len == 0 {
            bail!("ui.tick_history_len must be > 0");
        }
        if self.kite.history_days <= 0 {
            bail!("kite.history_days must be > 0");
        }
        if self.kite.exchange.trim().is_empty() {
            bail!("kite.exchange must not be empty");
        }
        self.indicators
            .validate()
            .context("indicators section is invalid")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_secret_keeps_tail() {
        assert_eq!(mask_secret(""), "(not set)");
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret("abcdefgh"), "****efgh");
    }

    #[test]
    fn api_keys_set_trims_and_get_round_trips() {
        let mut keys = ApiKeys::default();
        keys.set(ApiKeyField::NewsApiKey, "  news-key \n".to_string());
        assert_eq!(keys.get(ApiKeyField::NewsApiKey), "news-key");
        assert!(!keys.has_access_token());
        keys.set(ApiKeyField::KiteAccessToken, "tok".to_string());
        assert!(keys.has_access_token());
    }
}
