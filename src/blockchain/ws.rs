//! WebSocket JSON-RPC chain node connection.
//!
//! # Responsibilities
//! - Hold one WebSocket connection shared by every concurrent request
//! - Multiplex request/response pairs by JSON-RPC id
//! - Route `author_extrinsicUpdate` notifications to per-transaction subscriptions
//! - Unwatch on subscription close; fail everything on disconnect
//!
//! # Wire format
//! Status payloads follow the node's extrinsic status encoding:
//! `"ready"`, `{"inBlock": "0x.."}`, `{"finalized": "0x.."}`, ... An in-block
//! status may carry the block's decoded events as
//! `{"inBlock": {"blockHash": "0x..", "events": [{"module", "method"}]}}`;
//! without them the observer keeps waiting for a later update.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use alloy::primitives::{Address, B256};
use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

use crate::blockchain::client::{ChainNode, Subscription};
use crate::blockchain::transaction::encode_place_order;
use crate::blockchain::types::{
    ChainConfig, ChainError, ChainEvent, ChainNotification, ChainResult, SignedTransaction,
    StorageOrderRequest, TxStatus, UnsignedTx,
};

pub const SUBMIT_METHOD: &str = "author_submitAndWatchExtrinsic";
pub const UNWATCH_METHOD: &str = "author_unwatchExtrinsic";
pub const UPDATE_METHOD: &str = "author_extrinsicUpdate";
pub const NEXT_INDEX_METHOD: &str = "system_accountNextIndex";
pub const HEALTH_METHOD: &str = "system_health";

/// Unregistered subscription ids whose updates are buffered; oldest evicted first.
const MAX_ORPHANS: usize = 256;

type RpcReply = Result<Value, String>;
type PendingReply = (oneshot::Sender<RpcReply>, &'static str);

#[derive(Default)]
struct SubscriptionTable {
    senders: HashMap<String, mpsc::UnboundedSender<ChainNotification>>,
    // A node may push the first update before the subscribe reply is read.
    orphans: HashMap<String, Vec<ChainNotification>>,
    orphan_order: VecDeque<String>,
}

impl SubscriptionTable {
    fn buffer(&mut self, id: String, notification: ChainNotification) {
        if let Some(buffered) = self.orphans.get_mut(&id) {
            buffered.push(notification);
            return;
        }
        if self.orphan_order.len() >= MAX_ORPHANS {
            if let Some(oldest) = self.orphan_order.pop_front() {
                self.orphans.remove(&oldest);
            }
        }
        self.orphan_order.push_back(id.clone());
        self.orphans.insert(id, vec![notification]);
    }

    fn take_orphans(&mut self, id: &str) -> Vec<ChainNotification> {
        self.orphan_order.retain(|o| o != id);
        self.orphans.remove(id).unwrap_or_default()
    }
}

struct Inner {
    outbound: mpsc::UnboundedSender<Message>,
    next_id: AtomicU64,
    pending: DashMap<u64, PendingReply>,
    subscriptions: Mutex<SubscriptionTable>,
    connected: AtomicBool,
    chain_id: u64,
    rpc_timeout: Duration,
}

/// Shared chain node connection.
pub struct WsChainNode {
    inner: Arc<Inner>,
    url: String,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl WsChainNode {
    /// Open the connection and start the reader/writer tasks.
    pub async fn connect(config: &ChainConfig) -> ChainResult<Self> {
        let rpc_timeout = Duration::from_secs(config.rpc_timeout_secs);
        let url: url::Url = config.ws_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid WebSocket URL '{}': {}", config.ws_url, e))
        })?;

        let (stream, _) = match timeout(rpc_timeout, tokio_tungstenite::connect_async(url.as_str())).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => return Err(ChainError::Rpc(format!("Connection failed: {}", e))),
            Err(_) => return Err(ChainError::Timeout(config.rpc_timeout_secs)),
        };
        let (mut sink, mut source) = stream.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

        let inner = Arc::new(Inner {
            outbound,
            next_id: AtomicU64::new(1),
            pending: DashMap::new(),
            subscriptions: Mutex::new(SubscriptionTable::default()),
            connected: AtomicBool::new(true),
            chain_id: config.chain_id,
            rpc_timeout,
        });

        let writer = tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                let closing = matches!(message, Message::Close(_));
                if let Err(e) = sink.send(message).await {
                    tracing::warn!(error = %e, "WebSocket write failed");
                    break;
                }
                if closing {
                    break;
                }
            }
        });

        let reader_inner = Arc::clone(&inner);
        let reader = tokio::spawn(async move {
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => reader_inner.dispatch(text.as_str()),
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "WebSocket read failed");
                        break;
                    }
                }
            }
            reader_inner.disconnect();
        });

        tracing::info!(
            ws_url = %config.ws_url,
            chain_id = config.chain_id,
            "Chain node connected"
        );

        Ok(Self {
            inner,
            url: config.ws_url.clone(),
            tasks: Mutex::new(vec![writer, reader]),
        })
    }

    /// Close the connection. Open subscriptions end and pending calls fail.
    pub async fn shutdown(&self) {
        if self.inner.connected.load(Ordering::SeqCst) {
            let _ = self.inner.outbound.send(Message::Close(None));
        }

        let tasks = std::mem::take(&mut *lock(&self.tasks));
        for mut task in tasks {
            if timeout(Duration::from_secs(2), &mut task).await.is_err() {
                task.abort();
            }
        }
        self.inner.disconnect();
        tracing::info!(ws_url = %self.url, "Chain node disconnected");
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }
}

impl Drop for WsChainNode {
    fn drop(&mut self) {
        for task in lock(&self.tasks).drain(..) {
            task.abort();
        }
    }
}

#[async_trait]
impl ChainNode for WsChainNode {
    async fn build_place_order_tx(&self, request: &StorageOrderRequest) -> ChainResult<UnsignedTx> {
        encode_place_order(request, self.inner.chain_id)
    }

    async fn submit(&self, tx: &SignedTransaction) -> ChainResult<Subscription> {
        let encoded = format!("0x{}", alloy::hex::encode(tx.encoded()));
        let result = self
            .inner
            .request(SUBMIT_METHOD, json!([encoded]))
            .await
            .map_err(|e| ChainError::Submission(e.to_string()))?;
        let id = subscription_key(&result)
            .ok_or_else(|| ChainError::Submission(format!("unexpected subscribe reply: {}", result)))?;

        let (sender, receiver) = mpsc::unbounded_channel();
        {
            let mut table = lock(&self.inner.subscriptions);
            for notification in table.take_orphans(&id) {
                let _ = sender.send(notification);
            }
            table.senders.insert(id.clone(), sender);
        }

        let inner = Arc::clone(&self.inner);
        let unwatch_id = id.clone();
        Ok(Subscription::new(id, receiver, move || inner.unwatch(&unwatch_id)))
    }

    async fn current_nonce(&self, account: Address) -> ChainResult<u64> {
        let result = self
            .inner
            .request(NEXT_INDEX_METHOD, json!([account.to_string()]))
            .await?;
        result
            .as_u64()
            .ok_or_else(|| ChainError::Rpc(format!("unexpected nonce reply: {}", result)))
    }

    async fn is_healthy(&self) -> bool {
        self.inner.request(HEALTH_METHOD, json!([])).await.is_ok()
    }
}

impl Inner {
    async fn request(&self, method: &'static str, params: Value) -> ChainResult<Value> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(ChainError::NotConnected);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (reply_tx, reply_rx) = oneshot::channel();
        self.pending.insert(id, (reply_tx, method));
        let mut call = PendingCall {
            inner: self,
            id,
            method,
            rx: reply_rx,
            settled: false,
        };

        let frame = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        if self.outbound.send(Message::text(frame.to_string())).is_err() {
            self.pending.remove(&id);
            call.settled = true;
            return Err(ChainError::NotConnected);
        }

        let reply = timeout(self.rpc_timeout, &mut call.rx).await;
        let result = match reply {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(message))) => Err(ChainError::Rpc(message)),
            Ok(Err(_)) => Err(ChainError::NotConnected),
            Err(_) => {
                tracing::warn!(method = method, "RPC timeout");
                return Err(ChainError::Timeout(self.rpc_timeout.as_secs()));
            }
        };
        call.settled = true;
        result
    }

    fn dispatch(&self, text: &str) {
        let value: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed frame");
                return;
            }
        };

        if let Some(id) = value.get("id").and_then(Value::as_u64) {
            if let Some((_, (reply, method))) = self.pending.remove(&id) {
                let result = match value.get("error") {
                    Some(err) => Err(err
                        .get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| err.to_string())),
                    None => Ok(value.get("result").cloned().unwrap_or(Value::Null)),
                };
                if let Err(unclaimed) = reply.send(result) {
                    self.release_unclaimed(method, unclaimed);
                }
            }
            return;
        }

        if value.get("method").and_then(Value::as_str) != Some(UPDATE_METHOD) {
            return;
        }
        let params = &value["params"];
        let Some(id) = subscription_key(&params["subscription"]) else {
            tracing::warn!("Extrinsic update without subscription id");
            return;
        };
        match parse_status(&params["result"]) {
            Ok(notification) => self.route(id, notification),
            Err(e) => tracing::warn!(subscription = %id, error = %e, "Unrecognized extrinsic status"),
        }
    }

    fn route(&self, id: String, notification: ChainNotification) {
        let mut table = lock(&self.subscriptions);
        if let Some(sender) = table.senders.get(&id) {
            if sender.send(notification).is_err() {
                table.senders.remove(&id);
            }
            return;
        }
        table.buffer(id, notification);
    }

    /// A reply nobody waits for anymore. For a submit it names a node-side
    /// watch that no `Subscription` will ever close, so close it here.
    fn release_unclaimed(&self, method: &str, reply: RpcReply) {
        if method != SUBMIT_METHOD {
            return;
        }
        if let Some(id) = reply.ok().as_ref().and_then(subscription_key) {
            tracing::debug!(subscription = %id, "Unwatching abandoned submission");
            self.unwatch(&id);
        }
    }

    fn unwatch(&self, id: &str) {
        {
            let mut table = lock(&self.subscriptions);
            table.senders.remove(id);
            table.take_orphans(id);
        }
        if !self.connected.load(Ordering::SeqCst) {
            return;
        }
        // Fire and forget: no pending entry, the reply is discarded.
        let call_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let frame = json!({ "jsonrpc": "2.0", "id": call_id, "method": UNWATCH_METHOD, "params": [id] });
        let _ = self.outbound.send(Message::text(frame.to_string()));
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.pending.clear();
        let mut table = lock(&self.subscriptions);
        table.senders.clear();
        table.orphans.clear();
        table.orphan_order.clear();
    }
}

/// In-flight call. Dropped before it settles (cancelled or timed out), it
/// withdraws the pending entry, except for submits: those keep the entry so a
/// late reply can still be unwatched.
struct PendingCall<'a> {
    inner: &'a Inner,
    id: u64,
    method: &'static str,
    rx: oneshot::Receiver<RpcReply>,
    settled: bool,
}

impl Drop for PendingCall<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        self.rx.close();
        if self.method != SUBMIT_METHOD {
            self.inner.pending.remove(&self.id);
            return;
        }
        // The reply may have been delivered but never polled.
        if let Ok(reply) = self.rx.try_recv() {
            self.inner.release_unclaimed(self.method, reply);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn subscription_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_hash(value: &Value) -> Result<B256, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected hash string, got {}", value))?
        .parse::<B256>()
        .map_err(|e| format!("invalid hash: {}", e))
}

/// Decode one extrinsic status payload.
pub fn parse_status(value: &Value) -> Result<ChainNotification, String> {
    if let Some(tag) = value.as_str() {
        let status = match tag.to_ascii_lowercase().as_str() {
            "future" => TxStatus::Future,
            "ready" => TxStatus::Ready,
            "dropped" => TxStatus::Dropped,
            "invalid" => TxStatus::Invalid,
            other => return Err(format!("unknown status '{}'", other)),
        };
        return Ok(ChainNotification::status(status));
    }

    let object = value
        .as_object()
        .filter(|o| o.len() == 1)
        .ok_or_else(|| format!("unexpected status payload {}", value))?;
    let (tag, body) = object.iter().next().ok_or("empty status payload")?;

    let notification = match tag.as_str() {
        "broadcast" => ChainNotification::status(TxStatus::Broadcast),
        "inBlock" => match body {
            Value::Object(block) => {
                let hash = parse_hash(block.get("blockHash").unwrap_or(&Value::Null))?;
                let events: Vec<ChainEvent> = match block.get("events") {
                    Some(events) => serde_json::from_value(events.clone())
                        .map_err(|e| format!("invalid events: {}", e))?,
                    None => Vec::new(),
                };
                ChainNotification::in_block(hash, events)
            }
            other => ChainNotification::in_block(parse_hash(other)?, Vec::new()),
        },
        "retracted" => ChainNotification::status(TxStatus::Retracted).with_block(parse_hash(body)?),
        "finalityTimeout" => {
            ChainNotification::status(TxStatus::FinalityTimeout).with_block(parse_hash(body)?)
        }
        "finalized" => ChainNotification::status(TxStatus::Finalized).with_block(parse_hash(body)?),
        // Carries the hash of the replacing transaction, not a block.
        "usurped" => ChainNotification::status(TxStatus::Usurped),
        other => return Err(format!("unknown status '{}'", other)),
    };
    Ok(notification)
}
