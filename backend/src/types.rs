use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Inbound job request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobRequest {
    /// Caller's correlation token, echoed back as `jobRunID`
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub data: RequestData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestData {
    /// Bare ticker (e.g., "btc"), case-insensitive
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol: String,
}

/// Read an explicit `null` the same way as an absent key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outbound job result envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobResult {
    #[serde(rename = "jobRunID")]
    pub job_run_id: String,

    #[serde(rename = "statusCode")]
    pub status_code: u16,

    pub status: JobStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Success,
    Errored,
}

/// Price payload of a successful job result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseData {
    /// Symbol exactly as the caller sent it
    pub symbol: String,
    pub price: f64,
    pub source: PriceSource,
}

/// Upstream price source
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PriceSource {
    CoinGecko,
    Binance,
    #[serde(rename = "OKX")]
    Okx,
}

impl PriceSource {
    pub fn label(&self) -> &'static str {
        match self {
            PriceSource::CoinGecko => "CoinGecko",
            PriceSource::Binance => "Binance",
            PriceSource::Okx => "OKX",
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
}
