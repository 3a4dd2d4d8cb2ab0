//! Environment-driven configuration
//!
//! Everything is read once at startup. A malformed value is the only fatal
//! error the bot knows about.

use std::env;
use std::time::Duration;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// MACD period triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: 8,
            slow: 15,
            signal: 9,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub symbol: String,
    pub macd: MacdParams,
    pub poll_interval: Duration,
    pub intraday_lookback: String,
    pub daily_lookback: String,
    pub port: u16,
    pub discord_webhook: Option<Url>,
    pub cryptopanic_api_key: Option<String>,
    pub coinmarketcal_api_key: Option<String>,
    pub news_currency: String,
    pub events_coin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbol: "BTC-USD".to_string(),
            macd: MacdParams::default(),
            poll_interval: Duration::from_secs(60),
            intraday_lookback: "5d".to_string(),
            daily_lookback: "1y".to_string(),
            port: 10000,
            discord_webhook: None,
            cryptopanic_api_key: None,
            coinmarketcal_api_key: None,
            news_currency: "BTC".to_string(),
            events_coin: "bitcoin".to_string(),
        }
    }
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let symbol = get("SYMBOL").unwrap_or(defaults.symbol);
        let macd = MacdParams {
            fast: parse_positive("MACD_FAST", get("MACD_FAST"), defaults.macd.fast)?,
            slow: parse_positive("MACD_SLOW", get("MACD_SLOW"), defaults.macd.slow)?,
            signal: parse_positive("MACD_SIGNAL", get("MACD_SIGNAL"), defaults.macd.signal)?,
        };
        let poll_seconds = parse_positive(
            "POLL_SECONDS",
            get("POLL_SECONDS"),
            defaults.poll_interval.as_secs() as usize,
        )?;

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => defaults.port,
        };

        let discord_webhook = match get("DISCORD_WEBHOOK") {
            Some(raw) => Some(Url::parse(&raw).map_err(|e| ConfigError::Invalid {
                key: "DISCORD_WEBHOOK",
                value: raw.clone(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        let news_currency = get("NEWS_CURRENCY").unwrap_or_else(|| base_currency(&symbol));

        Ok(Self {
            macd,
            poll_interval: Duration::from_secs(poll_seconds as u64),
            intraday_lookback: get("LOOKBACK_PERIOD_15M").unwrap_or(defaults.intraday_lookback),
            daily_lookback: get("LOOKBACK_PERIOD_1D").unwrap_or(defaults.daily_lookback),
            port,
            discord_webhook,
            cryptopanic_api_key: get("CRYPTOPANIC_API_KEY"),
            coinmarketcal_api_key: get("COINMARKETCAL_API_KEY"),
            news_currency,
            events_coin: get("EVENTS_COIN").unwrap_or(defaults.events_coin),
            symbol,
        })
    }
}

fn parse_positive(
    key: &'static str,
    raw: Option<String>,
    default: usize,
) -> Result<usize, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<usize>() {
        Ok(0) => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(v) => Ok(v),
        Err(e) => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: e.to_string(),
        }),
    }
}

/// "BTC-USD" -> "BTC"
fn base_currency(symbol: &str) -> String {
    symbol
        .split(['-', '/'])
        .next()
        .unwrap_or(symbol)
        .to_uppercase()
}

/// Deployment environment, "sandbox" unless told otherwise
pub fn get_environment() -> String {
    env::var("ENVIRONMENT")
        .or_else(|_| env::var("APP_ENV"))
        .map(|v| v.to_lowercase())
        .unwrap_or_else(|_| "sandbox".to_string())
}
