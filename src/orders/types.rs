//! Order results and errors.

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::blockchain::types::{ChainError, OrderOutcome};
use crate::pinning::PinningError;

/// Errors that prevent an order from reaching an on-chain outcome.
///
/// On-chain failures are not errors; they are [`OrderOutcome`] variants.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Signing, nonce lookup, submission or subscription failure.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Pinning or size lookup failed.
    #[error(transparent)]
    Pinning(#[from] PinningError),

    /// No terminal outcome within the configured deadline.
    #[error("No on-chain outcome within {0} seconds")]
    ObservationTimeout(u64),

    /// The caller sent something unusable.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl OrderError {
    /// Short label for metrics and responses.
    pub fn kind(&self) -> &'static str {
        match self {
            OrderError::Chain(ChainError::InvalidSeed(_)) => "invalid_seed",
            OrderError::Chain(ChainError::Submission(_)) => "submission_error",
            OrderError::Chain(_) => "chain_error",
            OrderError::Pinning(_) => "pinning_error",
            OrderError::ObservationTimeout(_) => "timeout",
            OrderError::InvalidRequest(_) => "invalid_request",
        }
    }
}

/// Result type for order operations.
pub type OrderResult<T> = Result<T, OrderError>;

/// A submitted order and how it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub cid: String,
    pub size_bytes: u64,
    pub outcome: OrderOutcome,
    pub tx_hash: TxHash,
    pub nonce: u64,
}
