use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_CURRENCY_API_URL: &str =
    "https://cdn.jsdelivr.net/gh/fawazahmed0/currency-api@1/latest/currencies";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CurrencyApiProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub currency_api: Option<CurrencyApiProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            currency_api: Some(CurrencyApiProviderConfig {
                base_url: DEFAULT_CURRENCY_API_URL.to_string(),
            }),
        }
    }
}

fn default_from() -> String {
    "USD".to_string()
}

fn default_to() -> String {
    "INR".to_string()
}

fn default_amount() -> String {
    "1".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Source currency selected on start-up.
    #[serde(default = "default_from")]
    pub from: String,
    /// Target currency selected on start-up.
    #[serde(default = "default_to")]
    pub to: String,
    /// Raw amount filled in on start-up.
    #[serde(default = "default_amount")]
    pub amount: String,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            from: default_from(),
            to: default_to(),
            amount: default_amount(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the default config file, falling back to built-in defaults
    /// when it has not been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "rateconv", "rateconv")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn currency_api_url(&self) -> &str {
        self.providers
            .currency_api
            .as_ref()
            .map_or(DEFAULT_CURRENCY_API_URL, |p| &p.base_url)
    }
}
