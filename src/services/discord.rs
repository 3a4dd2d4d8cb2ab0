//! Outbound alert delivery over a Discord webhook

use crate::core::retry::RetryExecutor;
use crate::services::client::SharedHttpClient;
use crate::services::error::ServiceError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver_text(&self, content: &str) -> Result<(), ServiceError>;

    async fn deliver_file(
        &self,
        content: &str,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<(), ServiceError>;
}

/// Content type for an attachment, from its extension
pub fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(|e| e.to_ascii_lowercase()) {
        Some(ext) if ext == "png" => "image/png",
        _ => "application/octet-stream",
    }
}

pub struct DiscordNotifier {
    client: SharedHttpClient,
    retry: RetryExecutor,
    webhook: Option<Url>,
}

impl DiscordNotifier {
    pub fn new(client: SharedHttpClient, retry: RetryExecutor, webhook: Option<Url>) -> Self {
        Self {
            client,
            retry,
            webhook,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook.is_some()
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn deliver_text(&self, content: &str) -> Result<(), ServiceError> {
        let Some(webhook) = &self.webhook else {
            warn!("Discord webhook not configured. Cannot send message.");
            return Ok(());
        };
        let payload = json!({ "content": content });

        self.retry
            .run("discord.send_message", || async {
                let response = self
                    .client
                    .get()
                    .post(webhook.clone())
                    .json(&payload)
                    .send()
                    .await?;
                ServiceError::check_status("discord", response)?;
                Ok::<_, ServiceError>(())
            })
            .await?;
        debug!(length = content.len(), "Discord message delivered");
        Ok(())
    }

    async fn deliver_file(
        &self,
        content: &str,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<(), ServiceError> {
        let Some(webhook) = &self.webhook else {
            warn!("Discord webhook not configured. Cannot send file.");
            return Ok(());
        };
        let payload = json!({ "content": content }).to_string();
        let mime = content_type_for(filename);

        self.retry
            .run("discord.send_file", || async {
                // Forms are consumed by send, so rebuild one per attempt
                let file = Part::bytes(bytes.clone())
                    .file_name(filename.to_string())
                    .mime_str(mime)?;
                let form = Form::new()
                    .text("payload_json", payload.clone())
                    .part("file", file);
                let response = self
                    .client
                    .get()
                    .post(webhook.clone())
                    .multipart(form)
                    .send()
                    .await?;
                ServiceError::check_status("discord", response)?;
                Ok::<_, ServiceError>(())
            })
            .await?;
        debug!(filename = filename, size = bytes.len(), "Discord file delivered");
        Ok(())
    }
}
