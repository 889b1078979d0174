use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod job;
mod providers;
mod types;

use config::Config;
use providers::{BinanceClient, CoinGeckoClient, OkxClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "price_adapter=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting price adapter...");

    let config = Config::from_env()?;

    let http = providers::http_client(config.request_timeout)?;
    let state = api::AppState {
        coingecko: Arc::new(CoinGeckoClient::new(http.clone(), &config.providers.coingecko_url)),
        binance: Arc::new(BinanceClient::new(http.clone(), &config.providers.binance_url)),
        okx: Arc::new(OkxClient::new(http, &config.providers.okx_url)),
    };

    let app = api::create_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🌐 Listening on http://{}", addr);
    tracing::info!("   POST /coingecko  /binance  /okx   GET /health");

    axum::serve(listener, app).await?;

    Ok(())
}
