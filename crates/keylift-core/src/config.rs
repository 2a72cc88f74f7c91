use std::{env, path::Path};

use anyhow::{Context, Result};
use config as cfg;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }
    fn default_port() -> u16 {
        8000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CategorySettings {
    /// Directory of category template JSON files. When unset the templates
    /// compiled into the binary are used.
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "LlmSettings::default_enabled")]
    pub enabled: bool,
    #[serde(default = "LlmSettings::default_provider")]
    pub provider: String,
    #[serde(default = "LlmSettings::default_model")]
    pub model: String,
    #[serde(default = "LlmSettings::default_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
    #[serde(default = "LlmSettings::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "LlmSettings::default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "LlmSettings::default_temperature")]
    pub temperature: f32,
    #[serde(default = "LlmSettings::default_max_tokens")]
    pub max_tokens: usize,
}

impl LlmSettings {
    fn default_enabled() -> bool {
        true
    }
    fn default_provider() -> String {
        "openai".to_string()
    }
    fn default_model() -> String {
        "gpt-4o-mini".to_string()
    }
    fn default_base_url() -> String {
        "https://api.openai.com/v1".to_string()
    }
    fn default_timeout_secs() -> u64 {
        60
    }
    fn default_max_retries() -> u32 {
        2
    }
    fn default_temperature() -> f32 {
        0.7
    }
    fn default_max_tokens() -> usize {
        2000
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            provider: Self::default_provider(),
            model: Self::default_model(),
            base_url: Self::default_base_url(),
            api_key: None,
            timeout_secs: Self::default_timeout_secs(),
            max_retries: Self::default_max_retries(),
            temperature: Self::default_temperature(),
            max_tokens: Self::default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAdsSettings {
    #[serde(default = "SearchAdsSettings::default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing)]
    pub secret_key: Option<SecretString>,
    #[serde(default = "SearchAdsSettings::default_timeout_secs")]
    pub timeout_secs: u64,
    /// Hint keywords accepted per request by the upstream service.
    #[serde(default = "SearchAdsSettings::default_max_batch")]
    pub max_batch: usize,
}

impl SearchAdsSettings {
    fn default_base_url() -> String {
        "https://api.searchad.example.com".to_string()
    }
    fn default_timeout_secs() -> u64 {
        30
    }
    fn default_max_batch() -> usize {
        5
    }
}

impl Default for SearchAdsSettings {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            customer_id: None,
            api_key: None,
            secret_key: None,
            timeout_secs: Self::default_timeout_secs(),
            max_batch: Self::default_max_batch(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSearchSettings {
    #[serde(default = "ListingSearchSettings::default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub client_secret: Option<SecretString>,
    #[serde(default = "ListingSearchSettings::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ListingSearchSettings {
    fn default_base_url() -> String {
        "https://openapi.localsearch.example.com/v1/search/local.json".to_string()
    }
    fn default_timeout_secs() -> u64 {
        10
    }
}

impl Default for ListingSearchSettings {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            client_id: None,
            client_secret: None,
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationSettings {
    /// Remote demographics lookup. Unset means the embedded district table
    /// is the only source.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
    #[serde(default = "PopulationSettings::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl PopulationSettings {
    fn default_timeout_secs() -> u64 {
        3
    }
}

impl Default for PopulationSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingSettings {
    #[serde(default = "LoggingSettings::default_level")]
    pub level: String,
}

impl LoggingSettings {
    fn default_level() -> String {
        "info".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "Settings::default_env")]
    pub env: String,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub categories: CategorySettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub search_ads: SearchAdsSettings,
    #[serde(default)]
    pub listing_search: ListingSearchSettings,
    #[serde(default)]
    pub population: PopulationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env: Self::default_env(),
            server: ServerSettings::default(),
            categories: CategorySettings::default(),
            llm: LlmSettings::default(),
            search_ads: SearchAdsSettings::default(),
            listing_search: ListingSearchSettings::default(),
            population: PopulationSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    fn default_env() -> String {
        env::var("APP_ENV")
            .ok()
            .or_else(|| env::var("RUST_ENV").ok())
            .unwrap_or_else(|| "development".to_string())
    }

    /// Layered load: default.toml → {env}.toml → local.toml → KEYLIFT__*
    /// environment variables. Missing files are fine; the defaults above
    /// make an empty directory a valid configuration.
    pub fn load_from_sources(config_dir: &Path, env_name: &str) -> Result<Self> {
        let builder = cfg::Config::builder()
            .add_source(cfg::File::from(config_dir.join("default.toml")).required(false))
            .add_source(
                cfg::File::from(config_dir.join(format!("{}.toml", env_name))).required(false),
            )
            .add_source(cfg::File::from(config_dir.join("local.toml")).required(false))
            .add_source(cfg::Environment::with_prefix("KEYLIFT").separator("__"));

        let settings: Settings = builder
            .build()
            .context("building configuration")?
            .try_deserialize()
            .context("deserializing configuration")?;
        Ok(settings)
    }

    pub fn load_default() -> Result<Self> {
        let env_name = Self::default_env();
        let cwd = env::current_dir().unwrap_or_else(|_| ".".into());
        let config_dir = cwd.join("config");
        Self::load_from_sources(&config_dir, &env_name)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.server.host.trim().is_empty(),
            "server.host cannot be empty"
        );
        anyhow::ensure!(self.server.port > 0, "server.port must be > 0");
        anyhow::ensure!(
            self.search_ads.max_batch > 0,
            "search_ads.max_batch must be > 0"
        );
        anyhow::ensure!(
            (0.0..=2.0).contains(&self.llm.temperature),
            "llm.temperature must be within 0.0..=2.0"
        );
        Ok(())
    }
}
