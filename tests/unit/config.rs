//! Unit tests for configuration loading

use std::collections::HashMap;
use std::time::Duration;
use zerozoro::config::{Config, ConfigError, MacdParams};

fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn test_defaults() {
    let config = load(&[]).unwrap();
    assert_eq!(config.symbol, "BTC-USD");
    assert_eq!(
        config.macd,
        MacdParams {
            fast: 8,
            slow: 15,
            signal: 9
        }
    );
    assert_eq!(config.poll_interval, Duration::from_secs(60));
    assert_eq!(config.intraday_lookback, "5d");
    assert_eq!(config.daily_lookback, "1y");
    assert_eq!(config.port, 10000);
    assert!(config.discord_webhook.is_none());
    assert!(config.cryptopanic_api_key.is_none());
    assert_eq!(config.news_currency, "BTC");
    assert_eq!(config.events_coin, "bitcoin");
}

#[test]
fn test_overrides() {
    let config = load(&[
        ("SYMBOL", " eth-usd "),
        ("MACD_FAST", "12"),
        ("MACD_SLOW", "26"),
        ("MACD_SIGNAL", "9"),
        ("POLL_SECONDS", "300"),
        ("PORT", "8080"),
        ("DISCORD_WEBHOOK", "https://discord.com/api/webhooks/1/abc"),
        ("CRYPTOPANIC_API_KEY", "key"),
        ("LOOKBACK_PERIOD_15M", "7d"),
    ])
    .unwrap();
    assert_eq!(config.symbol, "eth-usd");
    assert_eq!(config.macd.slow, 26);
    assert_eq!(config.poll_interval, Duration::from_secs(300));
    assert_eq!(config.port, 8080);
    assert_eq!(
        config.discord_webhook.as_ref().map(|u| u.host_str()),
        Some(Some("discord.com"))
    );
    assert_eq!(config.cryptopanic_api_key.as_deref(), Some("key"));
    assert_eq!(config.intraday_lookback, "7d");
    assert_eq!(config.news_currency, "ETH");
}

#[test]
fn test_blank_values_are_unset() {
    let config = load(&[("DISCORD_WEBHOOK", "   "), ("CRYPTOPANIC_API_KEY", "")]).unwrap();
    assert!(config.discord_webhook.is_none());
    assert!(config.cryptopanic_api_key.is_none());
}

#[test]
fn test_rejects_invalid_values() {
    assert!(matches!(
        load(&[("MACD_FAST", "0")]),
        Err(ConfigError::Invalid { key: "MACD_FAST", .. })
    ));
    assert!(matches!(
        load(&[("POLL_SECONDS", "soon")]),
        Err(ConfigError::Invalid { key: "POLL_SECONDS", .. })
    ));
    assert!(matches!(
        load(&[("DISCORD_WEBHOOK", "not a url")]),
        Err(ConfigError::Invalid { key: "DISCORD_WEBHOOK", .. })
    ));
    assert!(load(&[("PORT", "70000")]).is_err());
}
