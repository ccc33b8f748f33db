//! Timeout enforcement.
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - A `None` deadline runs the future to completion
//! - Elapsed deadlines drop the inner future, which runs its cleanup

use std::future::Future;
use std::time::Duration;

/// Marker error for an elapsed deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed(pub Duration);

/// Await `fut`, bounded by `deadline` when one is set.
pub async fn with_deadline<F: Future>(deadline: Option<Duration>, fut: F) -> Result<F::Output, Elapsed> {
    match deadline {
        Some(d) => tokio::time::timeout(d, fut).await.map_err(|_| Elapsed(d)),
        None => Ok(fut.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_deadline_waits() {
        let out = with_deadline(None, async { 7 }).await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test]
    async fn test_deadline_elapses() {
        let out = with_deadline(
            Some(Duration::from_millis(20)),
            tokio::time::sleep(Duration::from_secs(10)),
        )
        .await;
        assert_eq!(out, Err(Elapsed(Duration::from_millis(20))));
    }
}
