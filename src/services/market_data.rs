//! Market data provider interface.

use crate::models::indicators::Candle;
use crate::models::signal::Timeframe;
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Historical candles for `symbol`, oldest first.
    ///
    /// Implementations log and return an empty series on any failure.
    async fn fetch_series(&self, symbol: &str, timeframe: Timeframe, lookback: &str)
        -> Vec<Candle>;
}

/// Provider that never has data
pub struct PlaceholderMarketDataProvider;

#[async_trait]
impl MarketDataProvider for PlaceholderMarketDataProvider {
    async fn fetch_series(
        &self,
        _symbol: &str,
        _timeframe: Timeframe,
        _lookback: &str,
    ) -> Vec<Candle> {
        Vec::new()
    }
}
