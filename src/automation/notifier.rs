use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::models::contracts::{Model, Status};

#[derive(Serialize)]
struct ChannelMessage<'a> {
    text: &'a str,
}

/// Best-effort poster to a chat channel (Slack-style incoming webhook).
///
/// Errors are logged and swallowed; a broken channel must never fail a callback.
#[derive(Clone)]
pub struct ChannelNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

impl ChannelNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self::with_timeout(webhook_url, DEFAULT_TIMEOUT)
    }

    /// A channel slower than `timeout` counts as a failed post.
    pub fn with_timeout(webhook_url: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            webhook_url,
        }
    }

    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Returns whether the message was accepted by the channel.
    pub async fn send(&self, text: &str) -> bool {
        let Some(url) = self.webhook_url.as_deref() else {
            debug!("Notification channel not configured, skipping");
            return false;
        };

        match self
            .client
            .post(url)
            .json(&ChannelMessage { text })
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(status = %resp.status(), "Notification channel rejected message");
                false
            }
            Err(e) => {
                warn!("Failed to post to notification channel: {e}");
                false
            }
        }
    }

    pub async fn contract_finished(&self, contract: &Model) -> bool {
        self.send(&finished_message(contract)).await
    }
}

pub fn finished_message(contract: &Model) -> String {
    match contract.status {
        Status::Completed => format!(
            "Contract {} is ready: {}",
            contract.contract_number,
            contract.pdf_url.as_deref().unwrap_or_default()
        ),
        Status::Failed => format!(
            "Contract {} failed to generate: {}",
            contract.contract_number,
            contract.error_message.as_deref().unwrap_or_default()
        ),
        other => format!("Contract {} is {other}", contract.contract_number),
    }
}
