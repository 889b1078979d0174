use super::{QuoteProvider, fetch_body, malformed_json, normalize_base};
use crate::{
    error::{AdapterError, Result},
    types::PriceSource,
};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko `/simple/price` client.
///
/// CoinGecko keys prices by its own coin ids, so only symbols with a known
/// id can be priced.
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base(base_url),
        }
    }

    /// Map a ticker to CoinGecko's coin id.
    pub fn coin_id(symbol: &str) -> Option<&'static str> {
        match symbol.to_uppercase().as_str() {
            "BTC" => Some("bitcoin"),
            "ETH" => Some("ethereum"),
            "LINK" => Some("chainlink"),
            _ => None,
        }
    }
}

#[async_trait]
impl QuoteProvider for CoinGeckoClient {
    fn source(&self) -> PriceSource {
        PriceSource::CoinGecko
    }

    async fn lookup(&self, symbol: &str) -> Result<f64> {
        let coin_id =
            Self::coin_id(symbol).ok_or_else(|| AdapterError::UnsupportedSymbol(symbol.to_string()))?;

        debug!("Fetching CoinGecko price for {} ({})", symbol, coin_id);

        let request = self
            .client
            .get(format!("{}/simple/price", self.base_url))
            .query(&[("ids", coin_id), ("vs_currencies", "usd")]);

        let body = fetch_body(request, self.source()).await?;
        parse_simple_price(&body, coin_id)
    }
}

/// Extract the USD price for `coin_id` from a reply shaped like
/// `{"bitcoin": {"usd": 65000.5}}`.
fn parse_simple_price(body: &[u8], coin_id: &str) -> Result<f64> {
    let parsed: HashMap<String, HashMap<String, f64>> =
        serde_json::from_slice(body).map_err(malformed_json)?;

    let coin = parsed
        .get(coin_id)
        .ok_or_else(|| AdapterError::MalformedResponse("coin data not found in response".to_string()))?;

    coin.get("usd")
        .copied()
        .ok_or_else(|| AdapterError::MalformedResponse("USD price not found in response".to_string()))
}
