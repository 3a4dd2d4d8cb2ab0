//! Collaborators around the core: market data, charts, delivery, feeds.

pub mod charting;
pub mod client;
pub mod discord;
pub mod error;
pub mod market_data;
pub mod news;
pub mod yahoo;

pub use charting::{ChartRenderer, PngChartRenderer};
pub use client::SharedHttpClient;
pub use discord::{DiscordNotifier, Notifier};
pub use error::ServiceError;
pub use market_data::MarketDataProvider;
pub use news::{CryptoFeeds, NewsProvider};
pub use yahoo::YahooFinanceProvider;
