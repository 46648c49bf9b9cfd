//! Configuration structures for the tradecheck system.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exchange endpoint configuration.
    pub exchange: ExchangeConfig,
    /// Reconciliation configuration.
    pub reconcile: ReconcileConfig,
}

impl Config {
    /// Parse a JSON document. Missing sections fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Where to fetch market data from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Base URL of the public REST API, without a trailing slash.
    pub base_url: String,
    /// Path of the candlestick endpoint.
    pub candlestick_path: String,
    /// Path of the trades endpoint.
    pub trades_path: String,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.crypto.com/v2".to_string(),
            candlestick_path: "/public/get-candlestick".to_string(),
            trades_path: "/public/get-trades".to_string(),
        }
    }
}

impl ExchangeConfig {
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// URL of the candlestick request for an instrument and interval code.
    pub fn candlestick_url(&self, instrument: &str, interval: &str) -> String {
        format!(
            "{}?instrument_name={}&timeframe={}",
            self.endpoint(&self.candlestick_path),
            urlencoding::encode(instrument),
            urlencoding::encode(interval)
        )
    }

    /// URL of the trades request. Without an instrument the exchange returns
    /// trades for every instrument.
    pub fn trades_url(&self, instrument: Option<&str>) -> String {
        let url = self.endpoint(&self.trades_path);
        match instrument.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => format!("{url}?instrument_name={}", urlencoding::encode(name)),
            None => url,
        }
    }
}

/// Reconciliation run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Number of worker threads (0 = rayon global pool, 1 = sequential).
    pub workers: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.exchange.base_url, "https://api.crypto.com/v2");
        assert_eq!(config.reconcile.workers, 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            Config::from_json_str(r#"{"exchange": {"base_url": "http://localhost:8080/"}}"#)
                .unwrap();
        assert_eq!(config.exchange.base_url, "http://localhost:8080/");
        assert_eq!(config.exchange.trades_path, "/public/get-trades");
        assert_eq!(config.reconcile.workers, 1);
    }

    #[test]
    fn test_invalid_json() {
        assert!(Config::from_json_str("{").is_err());
    }

    #[test]
    fn test_candlestick_url() {
        let config = ExchangeConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..ExchangeConfig::default()
        };
        assert_eq!(
            config.candlestick_url("BTC_USDT", "1D"),
            "http://localhost:8080/public/get-candlestick?instrument_name=BTC_USDT&timeframe=1D"
        );
    }

    #[test]
    fn test_trades_url() {
        let config = ExchangeConfig::default();
        assert_eq!(
            config.trades_url(None),
            "https://api.crypto.com/v2/public/get-trades"
        );
        assert_eq!(
            config.trades_url(Some("  ")),
            "https://api.crypto.com/v2/public/get-trades"
        );
        assert_eq!(
            config.trades_url(Some("ETH_USDT")),
            "https://api.crypto.com/v2/public/get-trades?instrument_name=ETH_USDT"
        );
    }

    #[test]
    fn test_url_encodes_query_values() {
        let config = ExchangeConfig::default();
        assert!(config.trades_url(Some("A&B")).ends_with("instrument_name=A%26B"));
    }
}
