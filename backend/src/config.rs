use crate::providers::{binance, coingecko, okx};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Timeout for each outbound provider call
    pub request_timeout: Duration,

    /// Upstream API locations
    pub providers: ProviderConfig,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub coingecko_url: String,
    pub binance_url: String,
    pub okx_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            coingecko_url: coingecko::DEFAULT_BASE_URL.to_string(),
            binance_url: binance::DEFAULT_BASE_URL.to_string(),
            okx_url: okx::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = ProviderConfig::default();

        Ok(Config {
            server_host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()?,
            request_timeout: Duration::from_secs(
                var("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|| "5".to_string())
                    .parse()?,
            ),
            providers: ProviderConfig {
                coingecko_url: var("COINGECKO_API_URL").unwrap_or(defaults.coingecko_url),
                binance_url: var("BINANCE_API_URL").unwrap_or(defaults.binance_url),
                okx_url: var("OKX_API_URL").unwrap_or(defaults.okx_url),
            },
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.providers.binance_url, "https://api.binance.com");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PORT", "9090"),
            ("SERVER_HOST", "127.0.0.1"),
            ("REQUEST_TIMEOUT_SECS", "2"),
            ("OKX_API_URL", "http://localhost:7000"),
        ])
        .unwrap();

        assert_eq!(config.listen_addr(), "127.0.0.1:9090");
        assert_eq!(config.request_timeout, Duration::from_secs(2));
        assert_eq!(config.providers.okx_url, "http://localhost:7000");
        assert_eq!(config.providers.coingecko_url, "https://api.coingecko.com/api/v3");
    }

    #[test]
    fn test_bad_port() {
        assert!(load(&[("PORT", "eighty")]).is_err());
    }
}
