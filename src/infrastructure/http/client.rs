use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

use crate::common::error::{StoreError, StoreResult};
use crate::common::response::ApiResponse;
use crate::config::AppConfig;

/// JSON-over-POST client for the video backend.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> StoreResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        info!("✅ Video API client ready for {}", config.api_base_url);

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            token: config.api_token.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> StoreResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Posts `body` to `path` and unwraps the envelope's `data`.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> StoreResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);

        let mut request = self.client.post(url).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&bytes)
                .map(|envelope| envelope.message_or(default_reason(status)))
                .unwrap_or_else(|_| default_reason(status).to_string());
            return Err(StoreError::Api { status, message });
        }

        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)?;
        if envelope.is_error() {
            return Err(StoreError::Api {
                status,
                message: envelope.message_or("request failed"),
            });
        }

        Ok(envelope.data)
    }
}

fn default_reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("request failed")
}
