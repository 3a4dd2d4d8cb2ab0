//! Unit tests for news and event formatting

use serde_json::json;
use std::collections::HashSet;
use zerozoro::services::news::{
    format_events, format_news, format_sentiment, Article, Event, Votes, MAX_NEW_ITEMS,
};

fn article(id: u64, positive: i64, negative: i64) -> Article {
    Article {
        id: json!(id),
        title: format!("Headline {}", id),
        url: format!("https://news.example/{}", id),
        votes: Votes { positive, negative },
    }
}

#[test]
fn test_sentiment_tags() {
    assert_eq!(format_sentiment(&Votes { positive: 3, negative: 1 }), "🟢 [Bullish]");
    assert_eq!(format_sentiment(&Votes { positive: 0, negative: 2 }), "🔴 [Bearish]");
    assert_eq!(format_sentiment(&Votes::default()), "⚪️ [Neutral]");
}

#[test]
fn test_news_messages_with_header() {
    let mut seen = HashSet::new();
    let messages = format_news(&[article(1, 5, 0)], &mut seen);
    assert_eq!(
        messages,
        vec![
            "--- 📰 Daily Crypto News Summary ---".to_string(),
            "**🟢 [Bullish]**: Headline 1\n<https://news.example/1>".to_string(),
        ]
    );
    assert!(seen.contains("1"));
}

#[test]
fn test_news_skips_seen_and_caps_new_items() {
    let articles: Vec<Article> = (1..=8).map(|i| article(i, 0, 0)).collect();
    let mut seen: HashSet<String> = ["1".to_string()].into_iter().collect();

    let messages = format_news(&articles, &mut seen);
    assert_eq!(messages.len(), MAX_NEW_ITEMS + 1);
    assert!(!messages.iter().any(|m| m.contains("Headline 1\n")));
    assert_eq!(seen.len(), MAX_NEW_ITEMS + 1);

    // Second pass only sees what is left
    let messages = format_news(&articles, &mut seen);
    assert_eq!(messages.len(), 3);
    assert!(format_news(&articles, &mut seen).is_empty());
}

#[test]
fn test_news_ignores_missing_ids() {
    let mut seen = HashSet::new();
    let mut no_id = article(1, 0, 0);
    no_id.id = serde_json::Value::Null;
    assert!(format_news(&[no_id], &mut seen).is_empty());
}

#[test]
fn test_event_messages() {
    let events = vec![
        Event {
            id: json!("ev-1"),
            title: json!({"en": "Mainnet upgrade"}),
            date_event: "2024-06-01T00:00:00Z".to_string(),
            source: "https://events.example/1".to_string(),
        },
        Event {
            id: json!(2),
            title: json!("Conference"),
            date_event: "2024-06-03".to_string(),
            source: "https://events.example/2".to_string(),
        },
    ];
    let mut seen = HashSet::new();
    let messages = format_events(&events, &mut seen);
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], "--- 🗓️ Upcoming Crypto Events ---");
    assert_eq!(
        messages[1],
        "🗓️ **2024-06-01**: Mainnet upgrade\n<https://events.example/1>"
    );
    assert!(messages[2].starts_with("🗓️ **2024-06-03**: Conference"));
    assert!(format_events(&events, &mut seen).is_empty());
}
