//! REST API
//!
//! One POST route per quote provider plus a health check. Every price route
//! answers with a job result envelope; only method mismatches fall outside it.

use crate::{
    error::AdapterError,
    job,
    providers::QuoteProvider,
    types::{HealthResponse, JobResult},
};
use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{MethodRouter, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Providers bound to the price routes
#[derive(Clone)]
pub struct AppState {
    pub coingecko: Arc<dyn QuoteProvider>,
    pub binance: Arc<dyn QuoteProvider>,
    pub okx: Arc<dyn QuoteProvider>,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/coingecko", price_route(state.coingecko))
        .route("/binance", price_route(state.binance))
        .route("/okx", price_route(state.okx))
        .route("/health", get(health_check).fallback(method_not_allowed))
        .layer(TraceLayer::new_for_http())
}

fn price_route(provider: Arc<dyn QuoteProvider>) -> MethodRouter {
    post(get_price).fallback(method_not_allowed).with_state(provider)
}

// ============================================================================
// PRICE ENDPOINTS
// ============================================================================

/// POST /coingecko, /binance, /okx
///
/// Body: `{"id": "<job id>", "data": {"symbol": "BTC"}}`
async fn get_price(
    State(provider): State<Arc<dyn QuoteProvider>>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body.map_err(AdapterError::BodyRead) {
        Ok(body) => body,
        Err(e) => {
            warn!("Rejecting {} job: {:?}", provider.source(), e);
            return job_response(JobResult::errored("", e.to_string(), e.status_code()));
        }
    };

    let request = match job::parse_request(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejecting {} job: {:?}", provider.source(), e);
            return job_response(JobResult::errored("", e.to_string(), e.status_code()));
        }
    };

    let symbol = match request.symbol() {
        Ok(symbol) => symbol,
        Err(e) => {
            return job_response(JobResult::errored(&request.id, e.to_string(), e.status_code()));
        }
    };

    info!("Job {}: fetching {} price for {}", request.id, provider.source(), symbol);

    match provider.lookup(symbol).await {
        Ok(price) => job_response(JobResult::success(&request.id, symbol, price, provider.source())),
        Err(e) => {
            warn!("Job {}: {} lookup for {} failed: {}", request.id, provider.source(), symbol, e);
            job_response(JobResult::errored(
                &request.id,
                format!("Error fetching price: {}", e),
                e.status_code(),
            ))
        }
    }
}

fn job_response(result: JobResult) -> Response {
    let status = StatusCode::from_u16(result.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(result)).into_response()
}

// ============================================================================
// HEALTH ENDPOINTS
// ============================================================================

/// GET /health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
