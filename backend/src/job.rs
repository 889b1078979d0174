//! Job envelope handling
//!
//! Parses inbound job requests and builds the job result envelope that every
//! price route answers with, success or not.

use crate::{
    error::{AdapterError, Result},
    types::{JobRequest, JobResult, JobStatus, PriceSource, ResponseData},
};
use axum::http::StatusCode;

/// Parse raw request bytes into a job request.
///
/// Absent `id`, `data` or `symbol` fields are not parse failures; they come
/// back empty so the symbol check can still echo the caller's `id`.
pub fn parse_request(body: &[u8]) -> Result<JobRequest> {
    serde_json::from_slice(body).map_err(AdapterError::BadRequest)
}

impl JobRequest {
    /// The requested symbol, or `MissingSymbol` if it is empty.
    pub fn symbol(&self) -> Result<&str> {
        if self.data.symbol.is_empty() {
            return Err(AdapterError::MissingSymbol);
        }
        Ok(&self.data.symbol)
    }
}

impl JobResult {
    pub fn success(job_run_id: impl Into<String>, symbol: &str, price: f64, source: PriceSource) -> Self {
        Self {
            job_run_id: job_run_id.into(),
            status_code: StatusCode::OK.as_u16(),
            status: JobStatus::Success,
            data: Some(ResponseData {
                symbol: symbol.to_string(),
                price,
                source,
            }),
            error: None,
        }
    }

    pub fn errored(job_run_id: impl Into<String>, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            job_run_id: job_run_id.into(),
            status_code: status.as_u16(),
            status: JobStatus::Errored,
            data: None,
            error: Some(message.into()),
        }
    }
}
