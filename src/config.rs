//! Application configuration loaded from environment variables.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Upstream Odds API ===
    /// Base URL of the upstream odds provider.
    #[serde(default = "default_odds_api_url")]
    pub odds_api_url: String,

    /// API key for the upstream odds provider.
    #[serde(default)]
    pub odds_api_key: Option<String>,

    /// Bookmaker regions to request (comma separated, provider syntax).
    #[serde(default = "default_odds_regions")]
    pub odds_regions: String,

    /// Upstream request timeout in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,

    // === Detection Parameters ===
    /// Minimum guaranteed profit percentage to report (e.g. 0.5 = 0.5%).
    #[serde(default)]
    pub min_profit_percentage: Decimal,

    /// Default total stake used to compute per-leg amounts.
    #[serde(default = "default_total_stake")]
    pub default_total_stake: Decimal,

    // === Caching ===
    /// Seconds to keep fetched odds per sport before refetching.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,

    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_odds_api_url() -> String {
    "https://api.the-odds-api.com".to_string()
}

fn default_odds_regions() -> String {
    "eu,uk".to_string()
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_total_stake() -> Decimal {
    Decimal::new(100, 0) // 100 units
}

fn default_cache_ttl() -> u64 {
    60
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.odds_api_url.is_empty() {
            return Err("ODDS_API_URL must not be empty".to_string());
        }

        if !self.odds_api_url.starts_with("http") {
            return Err("ODDS_API_URL must be an http(s) URL".to_string());
        }

        if self.default_total_stake <= Decimal::ZERO {
            return Err("DEFAULT_TOTAL_STAKE must be positive".to_string());
        }

        if self.min_profit_percentage < Decimal::ZERO {
            return Err("MIN_PROFIT_PERCENTAGE must not be negative".to_string());
        }

        if self.fetch_timeout_seconds == 0 {
            return Err("FETCH_TIMEOUT_SECONDS must be at least 1".to_string());
        }

        Ok(())
    }

    /// Whether an upstream API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.odds_api_key
            .as_deref()
            .map(|k| !k.is_empty())
            .unwrap_or(false)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            odds_api_url: default_odds_api_url(),
            odds_api_key: None,
            odds_regions: default_odds_regions(),
            fetch_timeout_seconds: default_fetch_timeout(),
            min_profit_percentage: Decimal::ZERO,
            default_total_stake: default_total_stake(),
            cache_ttl_seconds: default_cache_ttl(),
            port: default_port(),
        }
    }
}
