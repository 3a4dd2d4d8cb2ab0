//! Process-wide HTTP client, built on first use

use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::warn;

const USER_AGENT: &str = concat!("Mozilla/5.0 (compatible; zerozoro/", env!("CARGO_PKG_VERSION"), ")");

/// Cheap handle to one lazily created `reqwest::Client`.
///
/// Clones share the same connection pool.
#[derive(Clone, Default)]
pub struct SharedHttpClient {
    inner: Arc<OnceLock<reqwest::Client>>,
}

impl SharedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> &reqwest::Client {
        self.inner.get_or_init(|| {
            reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .connect_timeout(Duration::from_secs(10))
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|e| {
                    warn!(error = %e, "Falling back to default HTTP client");
                    reqwest::Client::new()
                })
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.get().is_some()
    }
}
