//! Shared fakes for integration testing.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use tokio::sync::{mpsc, Barrier};

use storage_order_bridge::blockchain::transaction::{encode_place_order, sign_transaction};
use storage_order_bridge::blockchain::{
    derive_credential, ChainError, ChainEvent, ChainNode, ChainNotification, ChainResult,
    Credential, SignedTransaction, StorageOrderRequest, Subscription, TxStatus, UnsignedTx,
};
use storage_order_bridge::pinning::{PinningError, PinningResult, PinningService};

/// Well-known development key; address 0xf39f…2266.
pub const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

pub const CHAIN_ID: u64 = 1;

pub fn credential() -> Credential {
    derive_credential(TEST_PRIVATE_KEY).unwrap()
}

/// Sign a place-order transaction for `cid` at `nonce`.
pub async fn signed(cid: &str, size_bytes: u64, nonce: u64) -> SignedTransaction {
    let tx = encode_place_order(&StorageOrderRequest::new(cid, size_bytes), CHAIN_ID).unwrap();
    sign_transaction(tx, nonce, &credential()).await.unwrap()
}

pub fn success_block() -> ChainNotification {
    ChainNotification::in_block(
        B256::repeat_byte(0x11),
        vec![
            ChainEvent::new("balances", "Withdraw"),
            ChainEvent::new("market", "FileSuccess"),
            ChainEvent::extrinsic_success(),
        ],
    )
}

pub fn failed_block() -> ChainNotification {
    ChainNotification::in_block(
        B256::repeat_byte(0x22),
        vec![ChainEvent::new("balances", "Withdraw"), ChainEvent::extrinsic_failed()],
    )
}

pub fn status(status: TxStatus) -> ChainNotification {
    ChainNotification::status(status)
}

/// In-memory chain node with scripted status updates per content identifier.
///
/// - The next nonce of an account is the number of its accepted submissions.
/// - A second submission reusing an accepted nonce is answered with `Invalid`.
/// - Streams end after the script unless `keep_streams_open` is set.
pub struct FakeChainNode {
    scripts: HashMap<String, Vec<ChainNotification>>,
    default_script: Vec<ChainNotification>,
    fail_submissions: bool,
    keep_open: bool,
    nonce_barrier: Option<Arc<Barrier>>,
    healthy: bool,
    used_nonces: Mutex<HashSet<(Address, u64)>>,
    open_senders: Mutex<Vec<mpsc::UnboundedSender<ChainNotification>>>,
    submitted: Mutex<Vec<SignedTransaction>>,
    submit_calls: AtomicU32,
    unsubscribes: Arc<AtomicU32>,
}

impl FakeChainNode {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            default_script: vec![status(TxStatus::Ready), success_block(), status(TxStatus::Finalized)],
            fail_submissions: false,
            keep_open: false,
            nonce_barrier: None,
            healthy: true,
            used_nonces: Mutex::new(HashSet::new()),
            open_senders: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            submit_calls: AtomicU32::new(0),
            unsubscribes: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn script(mut self, cid: &str, notifications: Vec<ChainNotification>) -> Self {
        self.scripts.insert(cid.to_string(), notifications);
        self
    }

    pub fn failing_submissions(mut self) -> Self {
        self.fail_submissions = true;
        self
    }

    pub fn keep_streams_open(mut self) -> Self {
        self.keep_open = true;
        self
    }

    /// Hold every nonce lookup at `barrier` after the nonce was read.
    pub fn with_nonce_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.nonce_barrier = Some(barrier);
        self
    }

    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn unsubscribes(&self) -> u32 {
        self.unsubscribes.load(Ordering::SeqCst)
    }

    pub fn submitted_nonces(&self) -> Vec<u64> {
        let mut nonces: Vec<u64> = self.submitted.lock().unwrap().iter().map(|tx| tx.nonce).collect();
        nonces.sort_unstable();
        nonces
    }

    pub fn submitted(&self) -> Vec<SignedTransaction> {
        self.submitted.lock().unwrap().clone()
    }

    fn accepted_for(&self, account: Address) -> u64 {
        self.used_nonces
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, _)| *a == account)
            .count() as u64
    }
}

#[async_trait]
impl ChainNode for FakeChainNode {
    async fn build_place_order_tx(&self, request: &StorageOrderRequest) -> ChainResult<UnsignedTx> {
        encode_place_order(request, CHAIN_ID)
    }

    async fn submit(&self, tx: &SignedTransaction) -> ChainResult<Subscription> {
        let call = self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_submissions {
            return Err(ChainError::Submission("connection reset by peer".to_string()));
        }
        self.submitted.lock().unwrap().push(tx.clone());

        let fresh = self.used_nonces.lock().unwrap().insert((tx.signer, tx.nonce));
        let script = if fresh {
            self.scripts
                .get(&tx.request.cid)
                .cloned()
                .unwrap_or_else(|| self.default_script.clone())
        } else {
            vec![status(TxStatus::Invalid)]
        };

        let (sender, rx) = mpsc::unbounded_channel();
        for notification in script {
            let _ = sender.send(notification);
        }
        if self.keep_open {
            self.open_senders.lock().unwrap().push(sender);
        }

        let unsubscribes = self.unsubscribes.clone();
        Ok(Subscription::new(format!("fake-{}", call), rx, move || {
            unsubscribes.fetch_add(1, Ordering::SeqCst);
        }))
    }

    async fn current_nonce(&self, account: Address) -> ChainResult<u64> {
        let nonce = self.accepted_for(account);
        if let Some(barrier) = &self.nonce_barrier {
            barrier.wait().await;
        }
        Ok(nonce)
    }

    async fn is_healthy(&self) -> bool {
        self.healthy
    }
}

/// Pinning service that knows a fixed set of sizes.
pub struct FakePinning {
    sizes: HashMap<String, u64>,
    fail_status: Option<u16>,
    pinned: Mutex<Vec<String>>,
}

impl FakePinning {
    pub fn new() -> Self {
        Self {
            sizes: HashMap::new(),
            fail_status: None,
            pinned: Mutex::new(Vec::new()),
        }
    }

    pub fn with_size(mut self, cid: &str, size: u64) -> Self {
        self.sizes.insert(cid.to_string(), size);
        self
    }

    /// Answer every pin request with `status`.
    pub fn failing_with(mut self, status: u16) -> Self {
        self.fail_status = Some(status);
        self
    }

    pub fn pinned(&self) -> Vec<String> {
        self.pinned.lock().unwrap().clone()
    }
}

#[async_trait]
impl PinningService for FakePinning {
    async fn ensure_pinned(&self, cid: &str) -> PinningResult<()> {
        if let Some(status) = self.fail_status {
            return Err(PinningError::Status {
                status,
                body: "pinning unavailable".to_string(),
            });
        }
        self.pinned.lock().unwrap().push(cid.to_string());
        Ok(())
    }

    async fn stat_size(&self, cid: &str) -> PinningResult<u64> {
        Ok(self.sizes.get(cid).copied().unwrap_or(1024))
    }
}
