//! Yahoo Finance chart API market data provider

use crate::core::retry::RetryExecutor;
use crate::models::indicators::Candle;
use crate::models::signal::Timeframe;
use crate::services::client::SharedHttpClient;
use crate::services::error::ServiceError;
use crate::services::market_data::MarketDataProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

pub struct YahooFinanceProvider {
    client: SharedHttpClient,
    retry: RetryExecutor,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(client: SharedHttpClient, retry: RetryExecutor) -> Self {
        Self::with_base_url(client, retry, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        client: SharedHttpClient,
        retry: RetryExecutor,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            retry,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn request_chart(
        &self,
        symbol: &str,
        interval: &str,
        range: &str,
    ) -> Result<Vec<Candle>, ServiceError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let label = format!("yahoo.chart[{}:{}]", symbol, interval);

        let body: ChartResponse = self
            .retry
            .run(&label, || async {
                let response = self
                    .client
                    .get()
                    .get(&url)
                    .query(&[("interval", interval), ("range", range)])
                    .send()
                    .await?;
                let response = ServiceError::check_status("yahoo", response)?;
                Ok::<_, ServiceError>(response.json::<ChartResponse>().await?)
            })
            .await?;

        parse_chart(body)
    }
}

fn parse_chart(body: ChartResponse) -> Result<Vec<Candle>, ServiceError> {
    if let Some(err) = body.chart.error {
        return Err(ServiceError::Malformed(format!(
            "{}: {}",
            err.code, err.description
        )));
    }
    let result = body
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| ServiceError::Malformed("chart has no result".to_string()))?;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let candles = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
            Some(Candle::new(
                field(&quote.open)?,
                field(&quote.high)?,
                field(&quote.low)?,
                field(&quote.close)?,
                field(&quote.volume)?,
                DateTime::<Utc>::from_timestamp(*ts, 0)?,
            ))
        })
        .collect();
    Ok(candles)
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    async fn fetch_series(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback: &str,
    ) -> Vec<Candle> {
        match self.request_chart(symbol, timeframe.interval(), lookback).await {
            Ok(candles) if candles.is_empty() => {
                error!(
                    symbol = symbol,
                    timeframe = %timeframe,
                    "No data returned from Yahoo Finance for {} on {}",
                    symbol,
                    timeframe.interval()
                );
                Vec::new()
            }
            Ok(candles) => {
                debug!(
                    symbol = symbol,
                    timeframe = %timeframe,
                    count = candles.len(),
                    "Fetched {} candles",
                    candles.len()
                );
                candles
            }
            Err(e) => {
                error!(
                    symbol = symbol,
                    timeframe = %timeframe,
                    error = %e,
                    "Failed to fetch data from Yahoo Finance for {} ({})",
                    symbol,
                    timeframe.interval()
                );
                Vec::new()
            }
        }
    }
}
