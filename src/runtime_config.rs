// =============================================================================
// Runtime Configuration — service settings loaded at startup
// =============================================================================
//
// Settings come from an optional JSON file, then environment variables
// override individual fields. All fields carry `#[serde(default)]` so that a
// partial (or empty) file still loads.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::binance::client::{ClientOptions, DEFAULT_BASE_URL};
use crate::catalog::{default_instruments, Instrument};
use crate::market_data::Interval;

pub const ENV_BIND_ADDR: &str = "ANALYST_BIND_ADDR";
pub const ENV_API_URL: &str = "ANALYST_API_URL";
pub const ENV_PROXY_URL: &str = "PROXY_URL";

/// Upper bound applied to `cache_ttl_secs` (one week).
pub const MAX_CACHE_TTL_SECS: u64 = 7 * 24 * 3600;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_limit() -> u32 {
    300
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

// =============================================================================
// AnalystConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalystConfig {
    /// Base URL of the Binance REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Kline granularity requested for every analysis.
    #[serde(default)]
    pub interval: Interval,

    /// Number of most recent candles requested (the partial one included).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Lifetime of cached kline responses; 0 disables the cache.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Request timeout; unset keeps the transport default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Optional HTTP(S) proxy for upstream requests.
    #[serde(default)]
    pub proxy_url: Option<String>,

    /// Address the REST API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Instruments offered to the dashboard.
    #[serde(default = "default_instruments")]
    pub instruments: Vec<Instrument>,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            interval: Interval::default(),
            limit: default_limit(),
            cache_ttl_secs: default_cache_ttl_secs(),
            request_timeout_secs: None,
            proxy_url: None,
            bind_addr: default_bind_addr(),
            instruments: default_instruments(),
        }
    }
}

impl AnalystConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing or unparsable file is an error so the caller can fall back
    /// to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            interval = %config.interval,
            instruments = config.instruments.len(),
            "config loaded"
        );

        Ok(config)
    }

    /// Apply overrides from `lookup` (normally `std::env::var`). Empty values
    /// are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(addr) = get(ENV_BIND_ADDR) {
            self.bind_addr = addr;
        }
        if let Some(url) = get(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(proxy) = get(ENV_PROXY_URL) {
            self.proxy_url = Some(proxy);
        }
    }

    /// Cache lifetime, clamped to [`MAX_CACHE_TTL_SECS`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs.min(MAX_CACHE_TTL_SECS))
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.api_base_url.clone(),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
            proxy_url: self.proxy_url.clone(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Instant;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = AnalystConfig::default();
        assert_eq!(cfg.api_base_url, "https://api.binance.com");
        assert_eq!(cfg.interval, Interval::OneDay);
        assert_eq!(cfg.limit, 300);
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(3600));
        assert!(cfg.request_timeout_secs.is_none());
        assert_eq!(cfg.instruments.len(), 20);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: AnalystConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.limit, 300);
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert_eq!(cfg.instruments[0].symbol, "BTCUSDT");
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{
            "interval": "4h",
            "request_timeout_secs": 15,
            "instruments": [{ "symbol": "ETHUSDT", "name": "Ethereum" }]
        }"#;
        let cfg: AnalystConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.interval, Interval::FourHours);
        assert_eq!(cfg.instruments.len(), 1);
        assert_eq!(cfg.cache_ttl_secs, 3600);
        assert_eq!(cfg.client_options().timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn unknown_interval_is_rejected() {
        assert!(serde_json::from_str::<AnalystConfig>(r#"{ "interval": "3m" }"#).is_err());
    }

    #[test]
    fn overrides_replace_fields() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BIND_ADDR, "127.0.0.1:8080"),
            (ENV_API_URL, "http://localhost:9999"),
            (ENV_PROXY_URL, "  "),
        ]);
        let mut cfg = AnalystConfig::default();
        cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.client_options().base_url, "http://localhost:9999");
        assert!(cfg.proxy_url.is_none());
    }

    #[test]
    fn huge_cache_ttl_is_clamped() {
        let cfg: AnalystConfig =
            serde_json::from_str(r#"{ "cache_ttl_secs": 18446744073709551615 }"#).unwrap();
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(MAX_CACHE_TTL_SECS));
        assert!(Instant::now().checked_add(cfg.cache_ttl()).is_some());
    }

    #[test]
    fn load_missing_file_is_error() {
        assert!(AnalystConfig::load("/nonexistent/analyst_config.json").is_err());
    }
}
