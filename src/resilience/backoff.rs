//! Delays between retries of pinning calls.
//!
//! Attempt `n` waits `base * 2^(n-1)`, capped at `max`, plus up to a tenth of
//! that as random spread so concurrent orders do not hit a recovering gateway
//! in lockstep.

use rand::Rng;
use std::time::Duration;

/// Delay before retry `attempt` (1-based); zero for attempt 0.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let capped_delay = base_ms
        .saturating_mul(2u64.saturating_pow(attempt - 1))
        .min(max_ms);

    let spread = match capped_delay / 10 {
        0 => 0,
        range => rand::thread_rng().gen_range(0..range),
    };

    Duration::from_millis(capped_delay + spread)
}
