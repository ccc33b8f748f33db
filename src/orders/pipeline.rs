//! Order pipeline: build, sign, submit, observe.

use std::sync::Arc;

use crate::blockchain::client::ChainNode;
use crate::blockchain::observer;
use crate::blockchain::transaction::sign_transaction;
use crate::blockchain::types::StorageOrderRequest;
use crate::blockchain::wallet::Credential;
use crate::orders::queue::SubmissionQueue;
use crate::orders::types::{OrderResult, PlacedOrder};

/// Places storage orders through a shared chain node.
#[derive(Clone)]
pub struct OrderPipeline {
    node: Arc<dyn ChainNode>,
    replica_count: u32,
    queue: Option<Arc<SubmissionQueue>>,
}

impl OrderPipeline {
    /// Create a pipeline without nonce serialization.
    pub fn new(node: Arc<dyn ChainNode>) -> Self {
        Self {
            node,
            replica_count: 0,
            queue: None,
        }
    }

    /// Replicas requested with every order.
    pub fn with_replica_count(mut self, replica_count: u32) -> Self {
        self.replica_count = replica_count;
        self
    }

    /// Serialize nonce lookup and submission per account through `queue`.
    pub fn with_submission_queue(mut self, queue: Arc<SubmissionQueue>) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Place one order for `cid` and wait for its outcome.
    ///
    /// The outcome or error of the observer is returned unchanged. Calling
    /// this twice with the same arguments places two independent orders.
    pub async fn place(
        &self,
        cid: &str,
        size_bytes: u64,
        credential: &Credential,
    ) -> OrderResult<PlacedOrder> {
        let request = StorageOrderRequest::new(cid, size_bytes).with_replicas(self.replica_count);
        let unsigned = self.node.build_place_order_tx(&request).await?;
        let account = credential.address();

        let (signed, subscription) = {
            let _slot = match &self.queue {
                Some(queue) => Some(queue.acquire(account).await),
                None => None,
            };
            let nonce = self.node.current_nonce(account).await?;
            let signed = sign_transaction(unsigned, nonce, credential).await?;
            let subscription = observer::submit(self.node.as_ref(), &signed).await?;
            (signed, subscription)
        };

        let outcome = observer::await_outcome(subscription, &signed).await?;

        Ok(PlacedOrder {
            cid: request.cid,
            size_bytes,
            outcome,
            tx_hash: signed.hash,
            nonce: signed.nonce,
        })
    }
}

impl std::fmt::Debug for OrderPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderPipeline")
            .field("replica_count", &self.replica_count)
            .field("serialized", &self.queue.is_some())
            .finish()
    }
}
