use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderRequest {
    pub cid: String,
}

/// Body of a confirmed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub request_id: String,
    pub cid: String,
    pub status: String,
    pub size_bytes: u64,
    pub tx_hash: String,
    pub nonce: u64,
}

/// Body of every failed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFailure {
    pub request_id: String,
    pub status: String,
    pub error: String,
    #[serde(default)]
    pub tx_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub chain: bool,
    pub account: String,
}

/// Result of placing an order: the receipt, or the HTTP status and failure body.
#[derive(Debug)]
pub enum OrderResult {
    Confirmed(OrderReceipt),
    Failed(StatusCode, OrderFailure),
}

pub struct OrderClient {
    client: Client,
    bridge_url: String,
}

impl OrderClient {
    pub fn new(bridge_url: &str) -> Self {
        Self {
            client: Client::new(),
            bridge_url: bridge_url.trim_end_matches('/').to_string(),
        }
    }

    /// Place a storage order for `cid`, optionally tagged with a request id.
    pub async fn place_order(
        &self,
        cid: &str,
        request_id: Option<&str>,
    ) -> Result<OrderResult, Box<dyn std::error::Error>> {
        let mut req = self
            .client
            .post(format!("{}/api/v1/orders", self.bridge_url))
            .json(&OrderRequest { cid: cid.to_string() });
        if let Some(id) = request_id {
            req = req.header("x-request-id", id);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if status.is_success() {
            Ok(OrderResult::Confirmed(serde_json::from_str(&text)?))
        } else {
            match serde_json::from_str::<OrderFailure>(&text) {
                Ok(failure) => Ok(OrderResult::Failed(status, failure)),
                Err(_) => Err(format!("Bridge returned error status {}: {}", status, text).into()),
            }
        }
    }

    /// Fetch the bridge health report, whatever its status code.
    pub async fn health(&self) -> Result<(StatusCode, Health), Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/health", self.bridge_url))
            .send()
            .await?;
        let status = resp.status();
        Ok((status, resp.json().await?))
    }
}
