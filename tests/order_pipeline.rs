//! Order pipeline and order service against fake collaborators.

use std::sync::Arc;

use tokio::sync::Barrier;

use storage_order_bridge::blockchain::{ChainError, OrderOutcome, TxStatus};
use storage_order_bridge::config::BridgeConfig;
use storage_order_bridge::orders::{OrderError, OrderPipeline, SubmissionQueue};
use storage_order_bridge::AppContext;

mod common;
use common::{credential, failed_block, status, FakeChainNode, FakePinning};

fn context(node: Arc<FakeChainNode>, pinning: Arc<FakePinning>, config: BridgeConfig) -> AppContext {
    AppContext::assemble(config, node, pinning, credential())
}

#[tokio::test]
async fn test_place_is_not_idempotent() {
    let node = Arc::new(FakeChainNode::new());
    let pipeline = OrderPipeline::new(node.clone());
    let credential = credential();

    let first = pipeline.place("QmTest1", 1024, &credential).await.unwrap();
    let second = pipeline.place("QmTest1", 1024, &credential).await.unwrap();

    assert!(first.outcome.is_confirmed());
    assert!(second.outcome.is_confirmed());
    assert_eq!((first.nonce, second.nonce), (0, 1));
    assert_ne!(first.tx_hash, second.tx_hash);
    assert_eq!(node.submit_calls(), 2);
}

#[tokio::test]
async fn test_replica_count_reaches_the_transaction() {
    let node = Arc::new(FakeChainNode::new());
    let pipeline = OrderPipeline::new(node.clone()).with_replica_count(3);

    pipeline.place("QmTest1", 1024, &credential()).await.unwrap();

    let submitted = node.submitted();
    let payload: serde_json::Value = serde_json::from_slice(&submitted[0].payload).unwrap();
    assert_eq!(payload["replicas"], 3);
    assert_eq!(payload["size"], 1024);
    assert_eq!(submitted[0].request.replica_count, 3);
}

#[tokio::test]
async fn test_outcome_passes_through_unchanged() {
    let node = Arc::new(FakeChainNode::new().script("QmTest3", vec![failed_block()]));
    let pipeline = OrderPipeline::new(node);

    let placed = pipeline.place("QmTest3", 512, &credential()).await.unwrap();

    assert_eq!(placed.outcome, OrderOutcome::Rejected { reason: "execution failed".into() });
    assert_eq!(placed.size_bytes, 512);
}

#[tokio::test]
async fn test_submission_error_propagates() {
    let node = Arc::new(FakeChainNode::new().failing_submissions());
    let pipeline = OrderPipeline::new(node.clone());

    let err = pipeline.place("QmTest1", 1024, &credential()).await.unwrap_err();

    assert!(matches!(err, OrderError::Chain(ChainError::Submission(_))));
    assert_eq!(node.unsubscribes(), 0);
}

#[tokio::test]
async fn test_concurrent_orders_race_on_nonce_without_queue() {
    let node = Arc::new(FakeChainNode::new().with_nonce_barrier(Arc::new(Barrier::new(2))));
    let pipeline = OrderPipeline::new(node.clone());
    let credential = credential();

    let (a, b) = tokio::join!(
        pipeline.place("QmRaceA", 1, &credential),
        pipeline.place("QmRaceB", 1, &credential),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!((a.nonce, b.nonce), (0, 0));
    let mut outcomes = [a.outcome.label(), b.outcome.label()];
    outcomes.sort_unstable();
    assert_eq!(outcomes, ["confirmed", "invalidated"]);
    let invalidated = if a.outcome.is_confirmed() { b.outcome } else { a.outcome };
    assert_eq!(invalidated, OrderOutcome::Invalidated { reason: "Invalid".into() });
}

#[tokio::test]
async fn test_submission_queue_serializes_nonces() {
    let node = Arc::new(FakeChainNode::new());
    let queue = Arc::new(SubmissionQueue::new());
    let pipeline = OrderPipeline::new(node.clone()).with_submission_queue(queue.clone());
    let credential = credential();

    let (a, b) = tokio::join!(
        pipeline.place("QmRaceA", 1, &credential),
        pipeline.place("QmRaceB", 1, &credential),
    );

    assert!(a.unwrap().outcome.is_confirmed());
    assert!(b.unwrap().outcome.is_confirmed());
    assert_eq!(node.submitted_nonces(), vec![0, 1]);
    assert_eq!(queue.accounts(), 1);
}

#[tokio::test]
async fn test_service_pins_measures_and_places() {
    let node = Arc::new(FakeChainNode::new());
    let pinning = Arc::new(FakePinning::new().with_size("QmTest1", 4096));
    let ctx = context(node.clone(), pinning.clone(), BridgeConfig::default());

    let placed = ctx.orders.submit("QmTest1").await.unwrap();

    assert_eq!(placed.outcome, OrderOutcome::Confirmed { cid: "QmTest1".into() });
    assert_eq!(placed.size_bytes, 4096);
    assert_eq!(pinning.pinned(), vec!["QmTest1".to_string()]);
    assert_eq!(ctx.orders.account(), credential().address());
}

#[tokio::test]
async fn test_service_stops_on_pinning_failure() {
    let node = Arc::new(FakeChainNode::new());
    let pinning = Arc::new(FakePinning::new().failing_with(503));
    let ctx = context(node.clone(), pinning, BridgeConfig::default());

    let err = ctx.orders.submit("QmTest1").await.unwrap_err();

    assert!(matches!(err, OrderError::Pinning(_)));
    assert_eq!(err.kind(), "pinning_error");
    assert_eq!(node.submit_calls(), 0);
}

#[tokio::test]
async fn test_service_rejects_malformed_cid() {
    let node = Arc::new(FakeChainNode::new());
    let pinning = Arc::new(FakePinning::new());
    let ctx = context(node.clone(), pinning.clone(), BridgeConfig::default());

    let err = ctx.orders.submit("not a cid").await.unwrap_err();

    assert!(matches!(err, OrderError::InvalidRequest(_)));
    assert!(pinning.pinned().is_empty());
    assert_eq!(node.submit_calls(), 0);
}

#[tokio::test]
async fn test_service_deadline_abandons_observation() {
    let node = Arc::new(
        FakeChainNode::new()
            .script("QmSlow", vec![status(TxStatus::Ready)])
            .keep_streams_open(),
    );
    let mut config = BridgeConfig::default();
    config.orders.observe_timeout_secs = Some(1);
    let ctx = context(node.clone(), Arc::new(FakePinning::new()), config);

    let err = ctx.orders.submit("QmSlow").await.unwrap_err();

    assert!(matches!(err, OrderError::ObservationTimeout(1)));
    assert_eq!(node.submit_calls(), 1);
    assert_eq!(node.unsubscribes(), 1);
}
