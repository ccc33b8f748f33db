//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to an external collaborator:
//!     → timeouts.rs (optional deadline around a future)
//!     → On failure: retries.rs (check if retryable, retry with backoff)
//!     → backoff.rs (exponential delay with jitter)
//! ```
//!
//! # Design Decisions
//! - Retries wrap the pinning HTTP calls only; chain submissions are never
//!   retried here because a resubmission is a new order
//! - Timeout errors are distinct from other errors

pub mod backoff;
pub mod retries;
pub mod timeouts;
