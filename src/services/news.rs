//! Daily news (CryptoPanic) and events (CoinMarketCal) feeds

use crate::core::retry::RetryExecutor;
use crate::services::client::SharedHttpClient;
use crate::services::error::ServiceError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, error};

/// New items announced per feed per call
pub const MAX_NEW_ITEMS: usize = 5;

pub const CRYPTOPANIC_BASE_URL: &str = "https://cryptopanic.com";
pub const COINMARKETCAL_BASE_URL: &str = "https://developers.coinmarketcal.com";

/// Source of ready-to-send daily announcements.
///
/// `seen` holds IDs already announced; implementations add every ID they
/// return a message for.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn poll_news(&self, seen: &mut HashSet<String>) -> Vec<String>;

    async fn poll_events(&self, seen: &mut HashSet<String>) -> Vec<String>;
}

#[derive(Debug, Deserialize)]
struct PostsResponse {
    #[serde(default)]
    results: Vec<Article>,
}

#[derive(Debug, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub votes: Votes,
}

#[derive(Debug, Default, Deserialize)]
pub struct Votes {
    #[serde(default)]
    pub positive: i64,
    #[serde(default)]
    pub negative: i64,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    body: Vec<Event>,
}

#[derive(Debug, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub date_event: String,
    #[serde(default)]
    pub source: String,
}

/// IDs arrive as numbers or strings; both count
fn id_string(id: &Value) -> Option<String> {
    match id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn format_sentiment(votes: &Votes) -> &'static str {
    if votes.positive > votes.negative {
        "🟢 [Bullish]"
    } else if votes.negative > votes.positive {
        "🔴 [Bearish]"
    } else {
        "⚪️ [Neutral]"
    }
}

/// Turn raw articles into messages, skipping seen IDs
pub fn format_news(articles: &[Article], seen: &mut HashSet<String>) -> Vec<String> {
    let mut messages = Vec::new();
    for article in articles {
        let Some(id) = id_string(&article.id) else {
            continue;
        };
        if seen.contains(&id) {
            continue;
        }
        if messages.len() >= MAX_NEW_ITEMS {
            break;
        }
        messages.push(format!(
            "**{}**: {}\n<{}>",
            format_sentiment(&article.votes),
            article.title,
            article.url
        ));
        seen.insert(id);
    }
    if !messages.is_empty() {
        messages.insert(0, "--- 📰 Daily Crypto News Summary ---".to_string());
    }
    messages
}

/// Turn raw events into messages, skipping seen IDs
pub fn format_events(events: &[Event], seen: &mut HashSet<String>) -> Vec<String> {
    let mut messages = Vec::new();
    for event in events {
        let Some(id) = id_string(&event.id) else {
            continue;
        };
        if seen.contains(&id) {
            continue;
        }
        if messages.len() >= MAX_NEW_ITEMS {
            break;
        }
        // Titles are either plain or localized {"en": ...}
        let title = match &event.title {
            Value::String(s) => s.clone(),
            Value::Object(map) => map
                .get("en")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        };
        let date = event.date_event.get(..10).unwrap_or(&event.date_event);
        messages.push(format!("🗓️ **{}**: {}\n<{}>", date, title, event.source));
        seen.insert(id);
    }
    if !messages.is_empty() {
        messages.insert(0, "--- 🗓️ Upcoming Crypto Events ---".to_string());
    }
    messages
}

pub struct CryptoFeeds {
    client: SharedHttpClient,
    retry: RetryExecutor,
    cryptopanic_key: Option<String>,
    coinmarketcal_key: Option<String>,
    currency: String,
    coin: String,
    cryptopanic_url: String,
    coinmarketcal_url: String,
}

impl CryptoFeeds {
    pub fn new(
        client: SharedHttpClient,
        retry: RetryExecutor,
        cryptopanic_key: Option<String>,
        coinmarketcal_key: Option<String>,
        currency: impl Into<String>,
        coin: impl Into<String>,
    ) -> Self {
        Self {
            client,
            retry,
            cryptopanic_key,
            coinmarketcal_key,
            currency: currency.into(),
            coin: coin.into(),
            cryptopanic_url: CRYPTOPANIC_BASE_URL.to_string(),
            coinmarketcal_url: COINMARKETCAL_BASE_URL.to_string(),
        }
    }

    /// Point both feeds at other hosts
    pub fn with_base_urls(
        mut self,
        cryptopanic: impl Into<String>,
        coinmarketcal: impl Into<String>,
    ) -> Self {
        self.cryptopanic_url = cryptopanic.into().trim_end_matches('/').to_string();
        self.coinmarketcal_url = coinmarketcal.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch_articles(&self, key: &str) -> Result<Vec<Article>, ServiceError> {
        let url = format!("{}/api/v1/posts/", self.cryptopanic_url);
        let body: PostsResponse = self
            .retry
            .run("cryptopanic.get", || async {
                let response = self
                    .client
                    .get()
                    .get(&url)
                    .query(&[
                        ("auth_token", key),
                        ("currencies", self.currency.as_str()),
                        ("public", "true"),
                    ])
                    .send()
                    .await?;
                let response = ServiceError::check_status("cryptopanic", response)?;
                Ok::<_, ServiceError>(response.json::<PostsResponse>().await?)
            })
            .await?;
        Ok(body.results)
    }

    async fn fetch_events(&self, key: &str) -> Result<Vec<Event>, ServiceError> {
        let url = format!("{}/v1/events", self.coinmarketcal_url);
        let max = (MAX_NEW_ITEMS * 2).to_string();
        let body: EventsResponse = self
            .retry
            .run("coinmarketcal.get", || async {
                let response = self
                    .client
                    .get()
                    .get(&url)
                    .header("x-api-key", key)
                    .header("Accept", "application/json")
                    .query(&[("coins", self.coin.as_str()), ("max", max.as_str())])
                    .send()
                    .await?;
                let response = ServiceError::check_status("coinmarketcal", response)?;
                Ok::<_, ServiceError>(response.json::<EventsResponse>().await?)
            })
            .await?;
        Ok(body.body)
    }
}

#[async_trait]
impl NewsProvider for CryptoFeeds {
    async fn poll_news(&self, seen: &mut HashSet<String>) -> Vec<String> {
        let Some(key) = self.cryptopanic_key.as_deref() else {
            debug!("CryptoPanic API key not configured, skipping news");
            return Vec::new();
        };
        match self.fetch_articles(key).await {
            Ok(articles) => format_news(&articles, seen),
            Err(e) => {
                error!(error = %e, "CryptoPanic API failed");
                Vec::new()
            }
        }
    }

    async fn poll_events(&self, seen: &mut HashSet<String>) -> Vec<String> {
        let Some(key) = self.coinmarketcal_key.as_deref() else {
            debug!("CoinMarketCal API key not configured, skipping events");
            return Vec::new();
        };
        match self.fetch_events(key).await {
            Ok(events) => format_events(&events, seen),
            Err(e) => {
                error!(error = %e, "CoinMarketCal API failed");
                Vec::new()
            }
        }
    }
}
