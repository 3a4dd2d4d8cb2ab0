use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }
}

/// MACD lines aligned index-for-index with their source candles.
///
/// Positions before an average is defined hold `NaN`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub main: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdSeries {
    pub fn len(&self) -> usize {
        self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }

    /// Keep only the last `n` positions of every line
    pub fn tail(&self, n: usize) -> Self {
        let skip = self.len().saturating_sub(n);
        Self {
            main: self.main[skip..].to_vec(),
            signal: self.signal[skip..].to_vec(),
            histogram: self.histogram[skip..].to_vec(),
        }
    }
}

/// A candle series plus its oscillator, when one could be computed.
///
/// `macd == None` means no indicator is available for this series this cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub candles: Vec<Candle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdSeries>,
}

impl IndicatorFrame {
    pub fn new(candles: Vec<Candle>) -> Self {
        Self {
            candles,
            macd: None,
        }
    }

    pub fn with_macd(mut self, macd: MacdSeries) -> Self {
        self.macd = Some(macd);
        self
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Trailing window of the last `n` periods
    pub fn tail(&self, n: usize) -> Self {
        let skip = self.candles.len().saturating_sub(n);
        Self {
            candles: self.candles[skip..].to_vec(),
            macd: self.macd.as_ref().map(|m| m.tail(n)),
        }
    }
}
