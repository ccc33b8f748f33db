//! Transaction observer.
//!
//! Drives one submitted transaction to a terminal [`OrderOutcome`]:
//!
//! ```text
//! Submitted ──▶ InBlock ──▶ Finalized
//!     │            │
//!     │            ├─ system.ExtrinsicFailed  → Rejected
//!     │            └─ system.ExtrinsicSuccess → Confirmed
//!     │
//!     └─ Invalid | Dropped | Usurped | Retracted → Invalidated
//! ```
//!
//! The first in-block outcome decides; finality is not awaited. Once an
//! outcome is produced the subscription is closed and nothing else is read.

use crate::blockchain::client::{ChainNode, Subscription};
use crate::blockchain::types::{
    ChainError, ChainNotification, ChainResult, OrderOutcome, SignedTransaction, TxStatus,
};

/// Reason attached to outcomes of failed in-block execution.
pub const EXECUTION_FAILED: &str = "execution failed";

/// Classify a single notification. `None` means keep waiting.
pub fn classify(notification: &ChainNotification, cid: &str) -> Option<OrderOutcome> {
    match notification.status {
        status if status.is_invalidating() => Some(OrderOutcome::Invalidated {
            reason: status.to_string(),
        }),
        TxStatus::InBlock => {
            if notification.events.iter().any(|e| e.is_extrinsic_failed()) {
                Some(OrderOutcome::Rejected {
                    reason: EXECUTION_FAILED.to_string(),
                })
            } else if notification.events.iter().any(|e| e.is_extrinsic_success()) {
                Some(OrderOutcome::Confirmed {
                    cid: cid.to_string(),
                })
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Consume `subscription` until the first terminal notification.
///
/// Closes the subscription before returning on every path.
pub async fn await_outcome(
    mut subscription: Subscription,
    tx: &SignedTransaction,
) -> ChainResult<OrderOutcome> {
    while let Some(notification) = subscription.next().await {
        match classify(&notification, &tx.request.cid) {
            Some(outcome) => {
                subscription.close();
                tracing::info!(
                    tx_hash = %tx.hash,
                    nonce = tx.nonce,
                    status = %notification.status,
                    block = ?notification.block_hash,
                    outcome = outcome.label(),
                    "Transaction resolved"
                );
                return Ok(outcome);
            }
            None => {
                tracing::debug!(
                    tx_hash = %tx.hash,
                    status = %notification.status,
                    events = notification.events.len(),
                    "Transaction update"
                );
            }
        }
    }

    tracing::warn!(tx_hash = %tx.hash, "Notification stream ended without an outcome");
    Err(ChainError::SubscriptionClosed)
}

/// Submit `tx` to `node` and wait for its terminal outcome.
///
/// A failing submission is returned as-is and never subscribes. No deadline is
/// applied here; callers bound the wait if they need to.
pub async fn observe<N>(node: &N, tx: SignedTransaction) -> ChainResult<OrderOutcome>
where
    N: ChainNode + ?Sized,
{
    let subscription = submit(node, &tx).await?;
    await_outcome(subscription, &tx).await
}

/// Submit `tx`, logging the subscription it produced.
pub(crate) async fn submit<N>(node: &N, tx: &SignedTransaction) -> ChainResult<Subscription>
where
    N: ChainNode + ?Sized,
{
    match node.submit(tx).await {
        Ok(subscription) => {
            tracing::info!(
                tx_hash = %tx.hash,
                nonce = tx.nonce,
                cid = %tx.request.cid,
                subscription = %subscription.id(),
                "Transaction submitted"
            );
            Ok(subscription)
        }
        Err(e) => {
            tracing::error!(tx_hash = %tx.hash, error = %e, "Transaction submission failed");
            Err(e)
        }
    }
}
