//! IPFS-compatible pinning client.
//!
//! # Responsibilities
//! - Ask the gateway to pin a content identifier
//! - Read the cumulative size of a pinned object
//! - Retry transient failures with backoff

use std::time::Duration;

use async_trait::async_trait;

use crate::config::{PinningConfig, RetryConfig};
use crate::observability::metrics;
use crate::pinning::types::{ObjectStat, PinningError, PinningResult};
use crate::resilience::retries::with_retry;

/// Operations consumed from the pinning service.
#[async_trait]
pub trait PinningService: Send + Sync {
    /// Make sure the content is pinned and retrievable.
    async fn ensure_pinned(&self, cid: &str) -> PinningResult<()>;

    /// Cumulative size of the content in bytes.
    async fn stat_size(&self, cid: &str) -> PinningResult<u64>;
}

/// Pinning client speaking the IPFS HTTP RPC API.
#[derive(Clone)]
pub struct IpfsPinningClient {
    http: reqwest::Client,
    endpoint: url::Url,
    auth_header: Option<String>,
    retries: RetryConfig,
}

impl IpfsPinningClient {
    /// Create a new pinning client.
    pub fn new(config: &PinningConfig, retries: RetryConfig) -> PinningResult<Self> {
        let mut endpoint: url::Url = config.endpoint.parse().map_err(|e| {
            PinningError::Http(format!("Invalid pinning endpoint '{}': {}", config.endpoint, e))
        })?;
        // Joining replaces the last segment unless the path ends in '/'.
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            auth_header: config.auth_header.clone(),
            retries,
        })
    }

    fn api_url(&self, command: &str, cid: &str) -> PinningResult<url::Url> {
        let mut url = self
            .endpoint
            .join(&format!("api/v0/{}", command))
            .map_err(|e| PinningError::Http(e.to_string()))?;
        url.query_pairs_mut().append_pair("arg", cid);
        Ok(url)
    }

    async fn post(&self, url: url::Url) -> PinningResult<reqwest::Response> {
        let mut request = self.http.post(url);
        if let Some(auth) = &self.auth_header {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PinningError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl PinningService for IpfsPinningClient {
    async fn ensure_pinned(&self, cid: &str) -> PinningResult<()> {
        let url = &self.api_url("pin/add", cid)?;
        let result = with_retry(&self.retries, "pin/add", || async move {
            self.post(url.clone()).await.map(|_| ())
        })
        .await;

        metrics::record_pinning("pin_add", result.is_ok());
        match &result {
            Ok(()) => tracing::info!(cid = %cid, "Content pinned"),
            Err(e) => tracing::warn!(cid = %cid, error = %e, "Pinning failed"),
        }
        result
    }

    async fn stat_size(&self, cid: &str) -> PinningResult<u64> {
        let url = &self.api_url("object/stat", cid)?;
        let result = with_retry(&self.retries, "object/stat", || async move {
            let response = self.post(url.clone()).await?;
            let stat: ObjectStat = response.json().await?;
            Ok::<_, PinningError>(stat.cumulative_size)
        })
        .await;

        metrics::record_pinning("object_stat", result.is_ok());
        if let Ok(size) = &result {
            tracing::debug!(cid = %cid, size_bytes = size, "Object size measured");
        }
        result
    }
}

impl std::fmt::Debug for IpfsPinningClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpfsPinningClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("authenticated", &self.auth_header.is_some())
            .finish()
    }
}
