use crate::models::indicators::IndicatorFrame;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Last recorded side of the zero line for one detection rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingState {
    AboveZero,
    BelowZero,
    #[default]
    Unset,
}

impl CrossingState {
    pub fn is_set(&self) -> bool {
        !matches!(self, CrossingState::Unset)
    }

    /// "ABOVE" / "BELOW" as used in alert titles
    pub fn direction(&self) -> &'static str {
        match self {
            CrossingState::AboveZero => "ABOVE",
            CrossingState::BelowZero => "BELOW",
            CrossingState::Unset => "UNSET",
        }
    }
}

impl fmt::Display for CrossingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CrossingState::AboveZero => "above_zero",
            CrossingState::BelowZero => "below_zero",
            CrossingState::Unset => "unset",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    Intraday,
    Daily,
}

impl Timeframe {
    /// Candle interval understood by the market data provider
    pub fn interval(&self) -> &'static str {
        match self {
            Timeframe::Intraday => "15m",
            Timeframe::Daily => "1d",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Intraday => "15m",
            Timeframe::Daily => "1D",
        }
    }

    /// Periods kept in a signal snapshot for rendering
    pub fn snapshot_len(&self) -> usize {
        match self {
            Timeframe::Intraday => 100,
            Timeframe::Daily => 200,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalRule {
    EarlyWarning,
    IntradayConfirmation,
    DailyConfirmation,
}

impl SignalRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalRule::EarlyWarning => "early_warning",
            SignalRule::IntradayConfirmation => "intraday_confirmation",
            SignalRule::DailyConfirmation => "daily_confirmation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub title: String,
    pub description: String,
    pub timeframe: Timeframe,
    pub rule: SignalRule,
    pub direction: CrossingState,
    pub snapshot: IndicatorFrame,
}

impl Signal {
    /// Message body sent alongside the chart
    pub fn alert_text(&self) -> String {
        format!("**🚨 ALERT: {}**\n{}", self.title, self.description)
    }
}
