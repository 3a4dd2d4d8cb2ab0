//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::config::MacdParams;
use crate::models::indicators::{Candle, IndicatorFrame, MacdSeries};
use tracing::debug;

/// Calculate the full MACD series for a closing-price sequence
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
///
/// Returns `None` when the periods are zero or the slow EMA cannot be seeded.
/// With enough history for the main line but not yet for its signal line,
/// `signal` and `histogram` are all `NaN`.
pub fn calculate_macd_series(
    closes: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Option<MacdSeries> {
    if closes.is_empty() || fast_period == 0 || slow_period == 0 || signal_period == 0 {
        return None;
    }

    let fast_ema = math::ema_series(closes, fast_period)?;
    let slow_ema = math::ema_series(closes, slow_period)?;

    let main: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(fast, slow)| fast - slow)
        .collect();
    let signal = math::ema_series(&main, signal_period)
        .unwrap_or_else(|| vec![f64::NAN; main.len()]);
    let histogram = main
        .iter()
        .zip(&signal)
        .map(|(macd, signal)| macd - signal)
        .collect();

    Some(MacdSeries {
        main,
        signal,
        histogram,
    })
}

/// Attaches MACD lines to candle series
#[derive(Debug, Clone, Copy)]
pub struct MacdCalculator {
    params: MacdParams,
}

impl MacdCalculator {
    pub fn new(params: MacdParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> MacdParams {
        self.params
    }

    /// Wrap `candles` in a frame, with the oscillator when it can be computed.
    ///
    /// A frame without `macd` is the "no indicator this cycle" answer; this
    /// never fails the caller.
    pub fn apply(&self, candles: Vec<Candle>) -> IndicatorFrame {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let frame = IndicatorFrame::new(candles);

        match calculate_macd_series(
            &closes,
            self.params.fast,
            self.params.slow,
            self.params.signal,
        ) {
            Some(macd) => frame.with_macd(macd),
            None => {
                debug!(
                    candles = closes.len(),
                    fast = self.params.fast,
                    slow = self.params.slow,
                    signal = self.params.signal,
                    "MACD unavailable for series"
                );
                frame
            }
        }
    }
}
