use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::error::{LlmError, Result};
use crate::core::ProviderKind;

/// HTTP transport shared by the provider adapters
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client. Without a timeout a stalled provider blocks forever.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| LlmError::ClientBuildFailed(e.to_string()))?;

        Ok(Self { client })
    }

    /// POST a JSON body and return the JSON response
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        provider: ProviderKind,
        url: &str,
        headers: header::HeaderMap,
        body: &B,
    ) -> Result<serde_json::Value> {
        debug!(%provider, url, "Sending request");

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    LlmError::InvalidApiKey { provider, message }
                }
                _ => LlmError::ApiError {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

/// Build a header value from an API key
pub(crate) fn key_header(
    provider: ProviderKind,
    api_key: &str,
) -> Result<header::HeaderValue> {
    header::HeaderValue::from_str(api_key).map_err(|e| LlmError::InvalidApiKey {
        provider,
        message: format!("Invalid API key format: {}", e),
    })
}
