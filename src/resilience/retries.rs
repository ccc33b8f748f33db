//! Generic request-retry wrapper.
//!
//! # Responsibilities
//! - Re-run a fallible async operation while its error is retryable
//! - Sleep with exponential backoff + jitter between attempts
//!
//! # Design Decisions
//! - The caller decides what is retryable; connection errors and 5xx usually are
//! - `enabled = false` means exactly one attempt

use std::future::Future;

use crate::config::RetryConfig;
use crate::resilience::backoff::calculate_backoff;

/// Errors that know whether another attempt could succeed.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// attempt budget from `config` is spent.
pub async fn with_retry<T, E, F, Fut>(config: &RetryConfig, op_name: &str, mut op: F) -> Result<T, E>
where
    E: Retryable + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = if config.enabled { config.max_attempts.max(1) } else { 1 };
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && e.is_retryable() => {
                let delay = calculate_backoff(attempt, config.base_delay_ms, config.max_delay_ms);
                tracing::info!(
                    op = op_name,
                    attempt = attempt,
                    delay = ?delay,
                    error = %e,
                    "Retrying request"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
