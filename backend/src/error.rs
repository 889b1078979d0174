use axum::{extract::rejection::BytesRejection, http::StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Error reading request body")]
    BodyRead(#[source] BytesRejection),

    #[error("Error parsing request JSON")]
    BadRequest(#[source] serde_json::Error),

    #[error("Symbol is required")]
    MissingSymbol,

    #[error("unsupported symbol: {0}")]
    UnsupportedSymbol(String),

    /// Upstream answered with something other than 200.
    #[error("bad response from {provider}: {status}")]
    UpstreamStatus { provider: &'static str, status: u16 },

    /// Connect, read or timeout failure talking to the upstream.
    #[error("error executing request: {0}")]
    UpstreamRequest(#[from] reqwest::Error),

    #[error("{0}")]
    MalformedResponse(String),

    #[error("symbol {instrument} not found in {provider} response")]
    SymbolNotFound {
        instrument: String,
        provider: &'static str,
    },

    #[error("no price data for {0}")]
    NoPriceData(String),
}

impl AdapterError {
    /// HTTP status reported for this error, both on the wire and in the
    /// job result's `statusCode`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdapterError::BodyRead(_) | AdapterError::BadRequest(_) | AdapterError::MissingSymbol => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;
