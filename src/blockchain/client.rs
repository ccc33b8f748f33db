//! Chain node interface and transaction subscriptions.
//!
//! # Responsibilities
//! - Define the operations the order pipeline needs from a chain node
//! - Provide the `Subscription` handle that streams status updates for one
//!   submitted transaction and unsubscribes on close or drop

use alloy::primitives::Address;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::blockchain::types::{
    ChainNotification, ChainResult, SignedTransaction, StorageOrderRequest, UnsignedTx,
};
use crate::observability::metrics;

/// Operations consumed from a chain node connection.
///
/// Implementations are shared across concurrent requests.
#[async_trait]
pub trait ChainNode: Send + Sync {
    /// Build an unsigned place-order transaction.
    async fn build_place_order_tx(&self, request: &StorageOrderRequest) -> ChainResult<UnsignedTx>;

    /// Submit a signed transaction and watch its status.
    ///
    /// Fails with `ChainError::Submission` when the node does not accept the
    /// submission; in that case no subscription exists.
    async fn submit(&self, tx: &SignedTransaction) -> ChainResult<Subscription>;

    /// Next nonce for `account`, as seen by the node.
    async fn current_nonce(&self, account: Address) -> ChainResult<u64>;

    /// Check if the node is reachable.
    async fn is_healthy(&self) -> bool {
        true
    }
}

type Closer = Box<dyn FnOnce() + Send>;

/// Ordered stream of notifications for one submitted transaction.
///
/// Closing (explicitly or by dropping) runs the unsubscribe hook exactly once.
pub struct Subscription {
    id: String,
    rx: mpsc::UnboundedReceiver<ChainNotification>,
    closer: Option<Closer>,
}

impl Subscription {
    /// Wrap a receiver; `on_close` tears down the node-side watch.
    pub fn new(
        id: impl Into<String>,
        rx: mpsc::UnboundedReceiver<ChainNotification>,
        on_close: impl FnOnce() + Send + 'static,
    ) -> Self {
        metrics::subscription_opened();
        Self {
            id: id.into(),
            rx,
            closer: Some(Box::new(on_close)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Wait for the next notification. `None` once the node ends the stream
    /// or the subscription was closed.
    pub async fn next(&mut self) -> Option<ChainNotification> {
        if self.closer.is_none() {
            return None;
        }
        self.rx.recv().await
    }

    /// Unsubscribe. Idempotent.
    pub fn close(&mut self) {
        if let Some(closer) = self.closer.take() {
            self.rx.close();
            closer();
            metrics::subscription_closed();
            tracing::debug!(subscription = %self.id, "Subscription closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closer.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
