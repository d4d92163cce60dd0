use crate::models::contracts;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API responded with HTTP {status}: {message}")]
    Api { status: u16, message: String },
}

/// Minimal HTTP client for the contract API, used by [`crate::store::ContractStore`].
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl ApiClient {
    pub fn new(base_url: &str, access_token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    /// GET /api/contracts
    pub async fn list_contracts(&self) -> Result<Vec<contracts::Model>, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/contracts", self.base_url))
            .bearer_auth(&self.access_token)
            .query(&[("limit", "100")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let message = body["error"]
                .as_str()
                .unwrap_or("unexpected response")
                .to_string();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
