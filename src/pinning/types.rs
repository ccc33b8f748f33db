//! Pinning types and errors.

use serde::Deserialize;
use thiserror::Error;

use crate::resilience::retries::Retryable;

/// Errors returned by the pinning service.
#[derive(Debug, Error)]
pub enum PinningError {
    /// Transport failure (connect, timeout, TLS).
    #[error("Pinning request failed: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("Pinning service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not what the API promises.
    #[error("Unexpected pinning response: {0}")]
    Decode(String),
}

/// Result type for pinning operations.
pub type PinningResult<T> = Result<T, PinningError>;

impl Retryable for PinningError {
    fn is_retryable(&self) -> bool {
        match self {
            PinningError::Http(_) => true,
            PinningError::Status { status, .. } => *status == 429 || *status >= 500,
            PinningError::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for PinningError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            PinningError::Decode(e.to_string())
        } else {
            PinningError::Http(e.to_string())
        }
    }
}

/// Subset of the `object/stat` reply the bridge needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectStat {
    pub hash: Option<String>,
    pub cumulative_size: u64,
}
