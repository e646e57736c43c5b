//! Partner API client.
//!
//! One GET per call, no retries. Every failure is logged here and reported to the
//! caller as `None`, which callers treat as "no data".

use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, InvalidHeaderValue},
};
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("failed to decode JSON: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Thin wrapper over a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    http: Client,
}

impl ApiClient {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// GETs `{base_url}{path}` and decodes the body as `T`.
    ///
    /// `path` may include a query string. Transport errors, non-2xx statuses and
    /// undecodable bodies all yield `None`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        base_url: &str,
        path: &str,
        headers: &HeaderMap,
    ) -> Option<T> {
        let url = format!("{base_url}{path}");

        match self.fetch(&url, headers).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(url = %url, error = %e, "API call failed");
                None
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str, headers: &HeaderMap) -> Result<T, ApiError> {
        let response = self
            .http
            .get(url)
            .headers(headers.clone())
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body = response.bytes().await.map_err(ApiError::Transport)?;
        serde_json::from_slice(&body).map_err(ApiError::Decode)
    }
}

/// Headers sent on every call to a region: its secret as `Authorization` plus a
/// JSON content type.
pub fn region_headers(credential: &str) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(credential)?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}
