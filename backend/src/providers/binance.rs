use super::{QuoteProvider, fetch_body, malformed_json, normalize_base, parse_price};
use crate::{
    error::{AdapterError, Result},
    types::PriceSource,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

const QUOTE_ASSET: &str = "USDT";

/// Binance `/api/v3/ticker/price` client
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    symbol: String,
    price: String,
}

impl BinanceClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base(base_url),
        }
    }

    /// Trading pair quoted in USDT (e.g., "btc" -> "BTCUSDT").
    pub fn pair(symbol: &str) -> String {
        format!("{}{}", symbol.to_uppercase(), QUOTE_ASSET)
    }
}

#[async_trait]
impl QuoteProvider for BinanceClient {
    fn source(&self) -> PriceSource {
        PriceSource::Binance
    }

    async fn lookup(&self, symbol: &str) -> Result<f64> {
        let pair = Self::pair(symbol);
        debug!("Fetching Binance price for {}", pair);

        let mut request = self.client.get(format!("{}/api/v3/ticker/price", self.base_url));
        // Without a symbol Binance lists every ticker
        if !symbol.is_empty() {
            request = request.query(&[("symbol", pair.as_str())]);
        }

        let body = fetch_body(request, self.source()).await?;
        parse_ticker_price(&body, &pair)
    }
}

/// Parse either a single ticker object or the full ticker array.
fn parse_ticker_price(body: &[u8], pair: &str) -> Result<f64> {
    let is_array = body
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'[');

    if is_array {
        let tickers: Vec<TickerPrice> = serde_json::from_slice(body).map_err(malformed_json)?;

        let ticker = tickers
            .iter()
            .find(|t| t.symbol == pair)
            .ok_or_else(|| AdapterError::SymbolNotFound {
                instrument: pair.to_string(),
                provider: PriceSource::Binance.label(),
            })?;

        parse_price(&ticker.price)
    } else {
        let ticker: TickerPrice = serde_json::from_slice(body).map_err(malformed_json)?;
        parse_price(&ticker.price)
    }
}
