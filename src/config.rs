//! Configuration management
//!
//! Values come from an optional TOML file, overridden by `ODDS_HUNTER_*`
//! environment variables (`ODDS_HUNTER_API__BASE_URL`, ...). A `.env`
//! file is honoured when present.

use crate::error::Result;
use crate::types::Region;
use config::{Environment, File, FileFormat};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Plain env fallback for the credential, matching the upstream docs.
pub const API_KEY_ENV: &str = "ODDS_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub value: ValueConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Never written back out
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            regions: default_regions(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    /// Parse the configured region list
    pub fn parsed_regions(&self) -> Result<Vec<Region>> {
        self.regions.iter().map(|r| r.parse()).collect()
    }
}

/// Value detection thresholds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValueConfig {
    /// Best price must exceed mean * this factor to count as value
    #[serde(default = "default_premium_threshold")]
    pub premium_threshold: Decimal,
    /// Best sources listed before collapsing into "+N more"
    #[serde(default = "default_max_best_sources")]
    pub max_best_sources: usize,
}

impl Default for ValueConfig {
    fn default() -> Self {
        Self {
            premium_threshold: default_premium_threshold(),
            max_best_sources: default_max_best_sources(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.the-odds-api.com/v4".to_string()
}

fn default_regions() -> Vec<String> {
    Region::ALL.iter().map(|r| r.as_str().to_string()).collect()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_premium_threshold() -> Decimal {
    dec!(1.04)
}

fn default_max_best_sources() -> usize {
    3
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(path: &str) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let path = shellexpand::tilde(path).into_owned();
        let settings = config::Config::builder()
            .add_source(File::new(&path, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("ODDS_HUNTER")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("api.regions")
                    .try_parsing(true),
            )
            .build()?;

        let mut cfg: Config = settings.try_deserialize()?;
        cfg.api.api_key = cfg
            .api
            .api_key
            .take()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        tracing::debug!(
            base_url = %cfg.api.base_url,
            regions = ?cfg.api.regions,
            has_key = cfg.api.api_key.is_some(),
            "Configuration loaded"
        );
        Ok(cfg)
    }
}
