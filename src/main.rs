//! ZeroZoro bot
//!
//! Runs the keep-alive web server and the MACD monitoring loop in one process.

use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use zerozoro::config::{get_environment, Config};
use zerozoro::core::http::{start_server, AppState};
use zerozoro::core::{supervise, Collaborators, Monitor, RetryExecutor};
use zerozoro::logging;
use zerozoro::metrics::Metrics;
use zerozoro::services::{
    CryptoFeeds, DiscordNotifier, SharedHttpClient, PngChartRenderer, YahooFinanceProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = Arc::new(Config::from_env()?);
    info!(environment = %get_environment(), "Environment");
    info!(
        symbol = %config.symbol,
        fast = config.macd.fast,
        slow = config.macd.slow,
        signal = config.macd.signal,
        poll_seconds = config.poll_interval.as_secs(),
        "Starting ZeroZoro"
    );

    let metrics = Arc::new(Metrics::new()?);

    info!(port = config.port, "Starting keep-alive web server on port {}...", config.port);
    let app_state = AppState {
        symbol: Arc::from(config.symbol.as_str()),
        metrics: metrics.clone(),
    };
    let port = config.port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, app_state).await {
            error!(error = %e, "HTTP server error");
        }
    });

    let client = SharedHttpClient::new();
    let retry = RetryExecutor::default();
    let collaborators = Collaborators {
        market: Arc::new(YahooFinanceProvider::new(client.clone(), retry.clone())),
        renderer: Arc::new(PngChartRenderer::new()),
        notifier: Arc::new(DiscordNotifier::new(
            client.clone(),
            retry.clone(),
            config.discord_webhook.clone(),
        )),
        news: Arc::new(CryptoFeeds::new(
            client,
            retry,
            config.cryptopanic_api_key.clone(),
            config.coinmarketcal_api_key.clone(),
            config.news_currency.clone(),
            config.events_coin.clone(),
        )),
    };

    info!("Starting bot monitoring loop...");
    let monitor = Monitor::new(config.clone(), collaborators).with_metrics(metrics);
    let monitor_handle = tokio::spawn(monitor.run());

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };
    supervise(ctrl_c, monitor_handle, server_handle).await?;
    Ok(())
}
