use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, warn};

use crate::generation::payload::TriggerRequest;
use crate::models::contracts;

/// Failure talking to the automation service. The display text is what ends up
/// in the contract's `error_message`, so keep it readable.
#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
    #[error("automation webhook is not configured")]
    NotConfigured,
    #[error("automation service timed out after {0:?}")]
    Timeout(Duration),
    #[error("could not reach automation service: {0}")]
    Network(String),
    #[error("automation service responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("automation service returned malformed JSON: {0}")]
    Decode(String),
}

/// What the automation service said back. Scenarios answer with either a JSON
/// document or a bare "Accepted" string; both count as success.
#[derive(Debug, Clone, PartialEq)]
pub enum AutomationReply {
    Json(serde_json::Value),
    Text(String),
}

/// Outbound side of the generation handshake: fires the webhook that starts
/// PDF generation for a contract.
#[derive(Clone)]
pub struct AutomationClient {
    client: reqwest::Client,
    webhook_url: Option<String>,
    timeout: Duration,
}

const MAX_ERROR_BODY: usize = 300;

impl AutomationClient {
    pub fn new(webhook_url: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            webhook_url,
            timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// POST the contract identifiers to the automation webhook. Single attempt.
    pub async fn trigger(
        &self,
        contract: &contracts::Model,
    ) -> Result<AutomationReply, AutomationError> {
        let url = self
            .webhook_url
            .as_deref()
            .ok_or(AutomationError::NotConfigured)?;

        debug!(contract_number = %contract.contract_number, "Triggering automation webhook");

        let response = self
            .client
            .post(url)
            .json(&TriggerRequest::for_contract(contract))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("json"));

        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            warn!(%status, contract_number = %contract.contract_number, "Automation webhook rejected request");
            return Err(AutomationError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        if is_json {
            serde_json::from_str(&body)
                .map(AutomationReply::Json)
                .map_err(|e| AutomationError::Decode(e.to_string()))
        } else {
            Ok(AutomationReply::Text(body))
        }
    }

    fn classify(&self, e: reqwest::Error) -> AutomationError {
        if e.is_timeout() {
            AutomationError::Timeout(self.timeout)
        } else {
            AutomationError::Network(e.to_string())
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}
