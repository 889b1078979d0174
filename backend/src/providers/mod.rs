//! Upstream quote providers
//!
//! Every provider resolves a bare ticker (e.g., "btc") to a single USD-ish
//! price with one outbound GET. The routes in `api` are bound to a provider
//! through the `QuoteProvider` trait, so request handling exists once.

pub mod binance;
pub mod coingecko;
pub mod okx;

use crate::{
    error::{AdapterError, Result},
    types::PriceSource,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

pub use binance::BinanceClient;
pub use coingecko::CoinGeckoClient;
pub use okx::OkxClient;

/// A source that can price a single symbol
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Label attached to every successful result
    fn source(&self) -> PriceSource;

    async fn lookup(&self, symbol: &str) -> Result<f64>;
}

/// Build the outbound HTTP client shared by a provider's lookups.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Send `request` and return the body of a 200 response.
///
/// Any other status becomes `UpstreamStatus`; transport failures and
/// timeouts become `UpstreamRequest`.
async fn fetch_body(request: RequestBuilder, source: PriceSource) -> Result<Vec<u8>> {
    let response = request.send().await.map_err(|e| {
        warn!("{} request failed: {}", source, e);
        AdapterError::UpstreamRequest(e)
    })?;

    let status = response.status();
    if status != StatusCode::OK {
        warn!("{} answered with {}", source, status);
        return Err(AdapterError::UpstreamStatus {
            provider: source.label(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    debug!("{} replied with {} bytes", source, body.len());

    Ok(body.to_vec())
}

/// Parse an upstream decimal string (e.g., "65000.50").
fn parse_price(raw: &str) -> Result<f64> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|e| AdapterError::MalformedResponse(format!("error parsing price: {}", e)))?;

    // NaN and infinities have no JSON representation
    if !price.is_finite() {
        return Err(AdapterError::MalformedResponse(format!(
            "error parsing price: non-finite value {}",
            raw
        )));
    }

    Ok(price)
}

fn malformed_json(e: serde_json::Error) -> AdapterError {
    AdapterError::MalformedResponse(format!("error parsing response JSON: {}", e))
}

/// Strip a trailing slash so paths can be appended with `format!`.
fn normalize_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{Router, http::StatusCode, routing::get};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Query strings seen by a fake upstream
    pub type SeenQueries = Arc<Mutex<Vec<HashMap<String, String>>>>;

    /// Serve `body` with `status` on `path` from a local port and return the
    /// base URL plus a log of query strings received.
    pub async fn fake_upstream(path: &str, status: StatusCode, body: &'static str) -> (String, SeenQueries) {
        let seen: SeenQueries = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        let app = Router::new().route(
            path,
            get(move |axum::extract::Query(q): axum::extract::Query<HashMap<String, String>>| {
                let log = log.clone();
                async move {
                    log.lock().unwrap().push(q);
                    (status, [("content-type", "application/json")], body)
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), seen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("65000.50").unwrap(), 65000.5);
        assert_eq!(parse_price(" 0.0001 ").unwrap(), 0.0001);
        assert_eq!(parse_price("42").unwrap(), 42.0);
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        for raw in ["", "abc", "1,5", "NaN", "inf"] {
            let err = parse_price(raw).unwrap_err();
            assert!(matches!(err, AdapterError::MalformedResponse(_)), "{}", raw);
            assert!(err.to_string().starts_with("error parsing price"));
        }
    }

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("https://www.okx.com/"), "https://www.okx.com");
        assert_eq!(normalize_base("http://127.0.0.1:9000"), "http://127.0.0.1:9000");
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let app = axum::Router::new().route(
            "/slow",
            axum::routing::get(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "{}"
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = http_client(Duration::from_secs(1)).unwrap();
        let err = fetch_body(client.get(format!("http://{}/slow", addr)), PriceSource::Okx)
            .await
            .unwrap_err();

        match &err {
            AdapterError::UpstreamRequest(e) => assert!(e.is_timeout()),
            other => panic!("expected upstream request error, got {:?}", other),
        }
        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_refused_connection_is_upstream_error() {
        let client = http_client(Duration::from_secs(1)).unwrap();
        let err = fetch_body(client.get("http://127.0.0.1:1/api/v3/ticker/price"), PriceSource::Binance)
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::UpstreamRequest(_)));
        assert!(err.to_string().starts_with("error executing request"));
    }
}
