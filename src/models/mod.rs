//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod signal;

pub use indicators::{Candle, IndicatorFrame, MacdSeries};
pub use signal::{CrossingState, Signal, SignalRule, Timeframe};
