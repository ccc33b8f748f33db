//! Per-account submission queue.
//!
//! Nonces come from the node's view of the account. Two submissions that
//! read the nonce before either reaches the node get the same value, so one
//! of them is invalidated. Holding the account slot from nonce lookup until
//! the node accepted the submission closes that window.

use std::sync::Arc;

use alloy::primitives::Address;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Exclusive right to acquire a nonce and submit for one account.
pub type SubmissionSlot = OwnedMutexGuard<()>;

/// Async per-account locks, created on first use.
#[derive(Debug, Default)]
pub struct SubmissionQueue {
    slots: DashMap<Address, Arc<Mutex<()>>>,
}

impl SubmissionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the account's slot. Released when the guard drops.
    pub async fn acquire(&self, account: Address) -> SubmissionSlot {
        let slot = self.slots.entry(account).or_default().clone();
        slot.lock_owned().await
    }

    /// Number of accounts seen so far.
    pub fn accounts(&self) -> usize {
        self.slots.len()
    }
}
