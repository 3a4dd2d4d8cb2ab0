//! Signal orchestration: three zero-line rules over two timeframes.

use crate::models::indicators::IndicatorFrame;
use crate::models::signal::{CrossingState, Signal, SignalRule, Timeframe};
use crate::signals::crossing::{check_cross, CURRENT, LAST_CLOSED, PREVIOUS_CLOSED};
use tracing::{debug, info};

/// History needed before an unconfirmed early warning is re-armed
pub const REARM_MIN_PERIODS: usize = 3;

/// One crossing state slot per rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrossingStates {
    pub early_warning: CrossingState,
    pub intraday_confirmation: CrossingState,
    pub daily_confirmation: CrossingState,
}

pub struct SignalEngine {
    symbol: String,
}

impl SignalEngine {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Run every rule against the latest frames, in rule order.
    ///
    /// Frames without candles or without an oscillator are skipped. Fired
    /// rules record their new state in `states`.
    pub fn find_signals(
        &self,
        states: &mut CrossingStates,
        intraday: &IndicatorFrame,
        daily: &IndicatorFrame,
    ) -> Vec<Signal> {
        let mut signals = Vec::new();

        if let Some(macd) = intraday.macd.as_ref().filter(|_| !intraday.is_empty()) {
            // Early warning: forming candle vs last closed candle
            let (fired, new_state) =
                check_cross(&macd.main, states.early_warning, CURRENT, LAST_CLOSED);
            if fired {
                signals.push(self.build_signal(
                    SignalRule::EarlyWarning,
                    new_state,
                    format!(
                        "{} 15m (Early Warning): MACD Line Crossing {} Zero",
                        self.symbol,
                        new_state.direction()
                    ),
                    "The MACD line is crossing the zero level on the current, unclosed 15-minute candle.",
                    intraday,
                    Timeframe::Intraday,
                ));
                states.early_warning = new_state;
            } else if macd.len() >= REARM_MIN_PERIODS && states.early_warning.is_set() {
                debug!(
                    symbol = %self.symbol,
                    previous = %states.early_warning,
                    "Re-arming early warning"
                );
                states.early_warning = CrossingState::Unset;
            }

            // Confirmation: the two most recent closed candles
            let (fired, new_state) = check_cross(
                &macd.signal,
                states.intraday_confirmation,
                LAST_CLOSED,
                PREVIOUS_CLOSED,
            );
            if fired {
                signals.push(self.build_signal(
                    SignalRule::IntradayConfirmation,
                    new_state,
                    format!(
                        "{} 15m (Confirmation): Signal Line Crossed {} Zero",
                        self.symbol,
                        new_state.direction()
                    ),
                    "The Signal line crossed the zero level on the recently closed 15-minute candle.",
                    intraday,
                    Timeframe::Intraday,
                ));
                states.intraday_confirmation = new_state;
            }
        }

        if let Some(macd) = daily.macd.as_ref().filter(|_| !daily.is_empty()) {
            let (fired, new_state) = check_cross(
                &macd.main,
                states.daily_confirmation,
                LAST_CLOSED,
                PREVIOUS_CLOSED,
            );
            if fired {
                signals.push(self.build_signal(
                    SignalRule::DailyConfirmation,
                    new_state,
                    format!(
                        "{} 1D: MACD Line Crossed {} Zero",
                        self.symbol,
                        new_state.direction()
                    ),
                    "The MACD line crossed the zero level on the daily chart.",
                    daily,
                    Timeframe::Daily,
                ));
                states.daily_confirmation = new_state;
            }
        }

        signals
    }

    fn build_signal(
        &self,
        rule: SignalRule,
        direction: CrossingState,
        title: String,
        description: &str,
        frame: &IndicatorFrame,
        timeframe: Timeframe,
    ) -> Signal {
        info!(
            symbol = %self.symbol,
            rule = rule.as_str(),
            timeframe = %timeframe,
            direction = %direction,
            "Signal found: {}",
            title
        );
        Signal {
            title,
            description: description.to_string(),
            timeframe,
            rule,
            direction,
            snapshot: frame.tail(timeframe.snapshot_len()),
        }
    }
}
