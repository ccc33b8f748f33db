//! Chain-specific types and error definitions.

use alloy::primitives::{Address, Bytes, TxHash, B256};
use alloy::signers::Signature;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::config::schema::ChainConfig;

/// Module name the runtime uses for extrinsic outcome events.
pub const SYSTEM_MODULE: &str = "system";
/// Emitted when an included extrinsic executed successfully.
pub const EXTRINSIC_SUCCESS: &str = "ExtrinsicSuccess";
/// Emitted when an included extrinsic failed during execution.
pub const EXTRINSIC_FAILED: &str = "ExtrinsicFailed";

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Seed could not be turned into a key pair.
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// The node refused or never received the submission.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// The notification stream ended before a terminal status arrived.
    #[error("Subscription closed before the transaction reached a terminal status")]
    SubscriptionClosed,

    /// Building or signing a payload failed.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The shared connection is gone (shut down or never opened).
    #[error("Chain node not connected")]
    NotConnected,
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Parameters of one storage order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageOrderRequest {
    /// Content identifier of the blob to store.
    pub cid: String,
    /// Cumulative size reported by the pinning service.
    pub size_bytes: u64,
    /// Requested replicas; 0 lets the network decide.
    #[serde(default)]
    pub replica_count: u32,
}

impl StorageOrderRequest {
    pub fn new(cid: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            cid: cid.into(),
            size_bytes,
            replica_count: 0,
        }
    }

    pub fn with_replicas(mut self, replica_count: u32) -> Self {
        self.replica_count = replica_count;
        self
    }
}

/// A place-order call encoded for a particular chain, not yet signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTx {
    pub request: StorageOrderRequest,
    /// Encoded call data.
    pub payload: Bytes,
    pub chain_id: u64,
}

/// A signed, wire-ready transaction bound to one nonce.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub request: StorageOrderRequest,
    pub payload: Bytes,
    pub nonce: u64,
    pub signer: Address,
    pub signature: Signature,
    /// Hash that was signed; doubles as the transaction identity.
    pub hash: TxHash,
}

impl SignedTransaction {
    /// Wire encoding: `payload ‖ nonce (u64 BE) ‖ signature (65 bytes)`.
    pub fn encoded(&self) -> Bytes {
        let mut out = Vec::with_capacity(self.payload.len() + 8 + 65);
        out.extend_from_slice(&self.payload);
        out.extend_from_slice(&self.nonce.to_be_bytes());
        out.extend_from_slice(&self.signature.as_bytes());
        out.into()
    }
}

/// Lifecycle status reported by the node for a watched transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxStatus {
    Future,
    Ready,
    Broadcast,
    InBlock,
    Retracted,
    FinalityTimeout,
    Finalized,
    Usurped,
    Dropped,
    Invalid,
}

impl TxStatus {
    /// Statuses after which the transaction can never be finalized.
    pub fn is_invalidating(self) -> bool {
        matches!(
            self,
            TxStatus::Invalid | TxStatus::Dropped | TxStatus::Usurped | TxStatus::Retracted
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TxStatus::Future => "Future",
            TxStatus::Ready => "Ready",
            TxStatus::Broadcast => "Broadcast",
            TxStatus::InBlock => "InBlock",
            TxStatus::Retracted => "Retracted",
            TxStatus::FinalityTimeout => "FinalityTimeout",
            TxStatus::Finalized => "Finalized",
            TxStatus::Usurped => "Usurped",
            TxStatus::Dropped => "Dropped",
            TxStatus::Invalid => "Invalid",
        }
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An on-chain event attached to a block notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEvent {
    #[serde(alias = "section")]
    pub module: String,
    pub method: String,
}

impl ChainEvent {
    pub fn new(module: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            method: method.into(),
        }
    }

    pub fn extrinsic_success() -> Self {
        Self::new(SYSTEM_MODULE, EXTRINSIC_SUCCESS)
    }

    pub fn extrinsic_failed() -> Self {
        Self::new(SYSTEM_MODULE, EXTRINSIC_FAILED)
    }

    fn is_system(&self, method: &str) -> bool {
        self.module.eq_ignore_ascii_case(SYSTEM_MODULE) && self.method == method
    }

    pub fn is_extrinsic_success(&self) -> bool {
        self.is_system(EXTRINSIC_SUCCESS)
    }

    pub fn is_extrinsic_failed(&self) -> bool {
        self.is_system(EXTRINSIC_FAILED)
    }
}

/// One status update for a watched transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainNotification {
    pub status: TxStatus,
    pub block_hash: Option<B256>,
    pub events: Vec<ChainEvent>,
}

impl ChainNotification {
    pub fn status(status: TxStatus) -> Self {
        Self {
            status,
            block_hash: None,
            events: Vec::new(),
        }
    }

    pub fn in_block(block_hash: B256, events: Vec<ChainEvent>) -> Self {
        Self {
            status: TxStatus::InBlock,
            block_hash: Some(block_hash),
            events,
        }
    }

    pub fn with_block(mut self, block_hash: B256) -> Self {
        self.block_hash = Some(block_hash);
        self
    }
}

/// Terminal result of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrderOutcome {
    /// Included and executed successfully.
    Confirmed { cid: String },
    /// Included, but execution failed; fees were still charged.
    Rejected { reason: String },
    /// Never included: the pool rejected or superseded it.
    Invalidated { reason: String },
}

impl OrderOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            OrderOutcome::Confirmed { .. } => "confirmed",
            OrderOutcome::Rejected { .. } => "rejected",
            OrderOutcome::Invalidated { .. } => "invalidated",
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, OrderOutcome::Confirmed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidating_statuses() {
        let invalidating: Vec<_> = [
            TxStatus::Future,
            TxStatus::Ready,
            TxStatus::Broadcast,
            TxStatus::InBlock,
            TxStatus::Retracted,
            TxStatus::FinalityTimeout,
            TxStatus::Finalized,
            TxStatus::Usurped,
            TxStatus::Dropped,
            TxStatus::Invalid,
        ]
        .into_iter()
        .filter(|s| s.is_invalidating())
        .collect();
        assert_eq!(
            invalidating,
            vec![TxStatus::Retracted, TxStatus::Usurped, TxStatus::Dropped, TxStatus::Invalid]
        );
    }

    #[test]
    fn test_event_matching() {
        assert!(ChainEvent::new("System", "ExtrinsicSuccess").is_extrinsic_success());
        assert!(ChainEvent::extrinsic_failed().is_extrinsic_failed());
        assert!(!ChainEvent::new("market", "ExtrinsicSuccess").is_extrinsic_success());
        assert!(!ChainEvent::new("system", "NewAccount").is_extrinsic_failed());
    }

    #[test]
    fn test_event_section_alias() {
        let event: ChainEvent =
            serde_json::from_str(r#"{"section":"system","method":"ExtrinsicFailed"}"#).unwrap();
        assert!(event.is_extrinsic_failed());
    }

    #[test]
    fn test_outcome_json_shape() {
        let json = serde_json::to_value(OrderOutcome::Invalidated {
            reason: "Dropped".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "invalidated");
        assert_eq!(json["reason"], "Dropped");
    }

    #[test]
    fn test_error_display() {
        let err = ChainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");
        assert!(ChainError::Submission("connection refused".into())
            .to_string()
            .contains("connection refused"));
    }
}
