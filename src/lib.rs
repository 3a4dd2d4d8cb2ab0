//! ZeroZoro: MACD zero-line alert bot.
//!
//! Polls an instrument on an intraday and a daily timeframe, derives the MACD
//! oscillator and announces each zero-line crossing exactly once.

pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
