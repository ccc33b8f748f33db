//! Order service: pinning + pipeline behind one call.
//!
//! # Responsibilities
//! - Validate the content identifier
//! - Ensure the content is pinned and measure its size
//! - Place the order with the credential loaded at startup
//! - Bound the wait for an outcome when a deadline is configured

use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::primitives::Address;

use crate::blockchain::wallet::Credential;
use crate::observability::metrics;
use crate::orders::pipeline::OrderPipeline;
use crate::orders::types::{OrderError, OrderResult, PlacedOrder};
use crate::pinning::PinningService;
use crate::resilience::timeouts::{with_deadline, Elapsed};

/// Longest content identifier accepted.
pub const MAX_CID_LEN: usize = 128;

/// Entry point used by the HTTP layer.
#[derive(Clone)]
pub struct OrderService {
    pinning: Arc<dyn PinningService>,
    pipeline: OrderPipeline,
    credential: Credential,
    observe_timeout: Option<Duration>,
}

impl OrderService {
    pub fn new(
        pinning: Arc<dyn PinningService>,
        pipeline: OrderPipeline,
        credential: Credential,
    ) -> Self {
        Self {
            pinning,
            pipeline,
            credential,
            observe_timeout: None,
        }
    }

    /// Give up waiting for an outcome after `timeout`.
    pub fn with_observe_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.observe_timeout = timeout;
        self
    }

    /// Account that signs every order.
    pub fn account(&self) -> Address {
        self.credential.address()
    }

    /// Pin, measure and place an order for `cid`.
    pub async fn submit(&self, cid: &str) -> OrderResult<PlacedOrder> {
        let start = Instant::now();
        let result = self.run(cid).await;

        match &result {
            Ok(placed) => {
                metrics::record_order(placed.outcome.label(), start);
                tracing::info!(
                    cid = %cid,
                    size_bytes = placed.size_bytes,
                    nonce = placed.nonce,
                    tx_hash = %placed.tx_hash,
                    outcome = placed.outcome.label(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Order finished"
                );
            }
            Err(e) => {
                metrics::record_order(e.kind(), start);
                tracing::warn!(cid = %cid, error = %e, kind = e.kind(), "Order failed");
            }
        }
        result
    }

    async fn run(&self, cid: &str) -> OrderResult<PlacedOrder> {
        validate_cid(cid)?;
        self.pinning.ensure_pinned(cid).await?;
        let size_bytes = self.pinning.stat_size(cid).await?;

        with_deadline(
            self.observe_timeout,
            self.pipeline.place(cid, size_bytes, &self.credential),
        )
        .await
        .map_err(|Elapsed(limit)| OrderError::ObservationTimeout(limit.as_secs()))?
    }
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("account", &self.account())
            .field("pipeline", &self.pipeline)
            .field("observe_timeout", &self.observe_timeout)
            .finish()
    }
}

/// Reject identifiers that cannot be content addresses.
pub fn validate_cid(cid: &str) -> OrderResult<()> {
    if cid.is_empty() {
        return Err(OrderError::InvalidRequest("cid must not be empty".to_string()));
    }
    if cid.len() > MAX_CID_LEN {
        return Err(OrderError::InvalidRequest(format!(
            "cid longer than {} characters",
            MAX_CID_LEN
        )));
    }
    if !cid.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(OrderError::InvalidRequest(
            "cid must be base58/base32 alphanumeric".to_string(),
        ));
    }
    Ok(())
}
