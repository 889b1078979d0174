use super::{QuoteProvider, fetch_body, malformed_json, normalize_base, parse_price};
use crate::{
    error::{AdapterError, Result},
    types::{PriceSource, null_as_default},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://www.okx.com";

const QUOTE_ASSET: &str = "USDT";

/// OKX spot tickers client.
///
/// OKX is queried for the whole spot market and filtered locally.
pub struct OkxClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TickersResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    data: Vec<Ticker>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Ticker {
    #[serde(deserialize_with = "null_as_default")]
    inst_id: String,
    #[serde(deserialize_with = "null_as_default")]
    last: String,
    #[serde(deserialize_with = "null_as_default")]
    last_px: String,
    #[serde(deserialize_with = "null_as_default")]
    ask_px: String,
    #[serde(deserialize_with = "null_as_default")]
    bid_px: String,
}

impl OkxClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base(base_url),
        }
    }

    /// Instrument id quoted in USDT (e.g., "btc" -> "BTC-USDT").
    pub fn instrument_id(symbol: &str) -> String {
        format!("{}-{}", symbol.to_uppercase(), QUOTE_ASSET)
    }
}

#[async_trait]
impl QuoteProvider for OkxClient {
    fn source(&self) -> PriceSource {
        PriceSource::Okx
    }

    async fn lookup(&self, symbol: &str) -> Result<f64> {
        let inst_id = Self::instrument_id(symbol);
        debug!("Fetching OKX price for {}", inst_id);

        let request = self
            .client
            .get(format!("{}/api/v5/market/tickers", self.base_url))
            .query(&[("instType", "SPOT")]);

        let body = fetch_body(request, self.source()).await?;
        parse_tickers(&body, &inst_id)
    }
}

fn parse_tickers(body: &[u8], inst_id: &str) -> Result<f64> {
    let response: TickersResponse = serde_json::from_slice(body).map_err(malformed_json)?;

    let ticker = response
        .data
        .iter()
        .find(|t| t.inst_id == inst_id)
        .ok_or_else(|| AdapterError::SymbolNotFound {
            instrument: inst_id.to_string(),
            provider: PriceSource::Okx.label(),
        })?;

    ticker_price(ticker)
}

/// Last trade price, falling back to the bid/ask midpoint.
fn ticker_price(ticker: &Ticker) -> Result<f64> {
    let last = if ticker.last.is_empty() {
        &ticker.last_px
    } else {
        &ticker.last
    };

    if !last.is_empty() {
        return parse_price(last);
    }

    if ticker.ask_px.is_empty() || ticker.bid_px.is_empty() {
        return Err(AdapterError::NoPriceData(ticker.inst_id.clone()));
    }

    let ask = parse_price(&ticker.ask_px)?;
    let bid = parse_price(&ticker.bid_px)?;
    Ok((ask + bid) / 2.0)
}
