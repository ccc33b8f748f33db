//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the order and health handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Stop accepting on shutdown and drain in-flight requests

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::blockchain::client::ChainNode;
use crate::config::BridgeConfig;
use crate::http::orders::{health, place_order};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::orders::OrderService;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderService>,
    pub node: Arc<dyn ChainNode>,
}

impl AppState {
    pub fn new(orders: Arc<OrderService>, node: Arc<dyn ChainNode>) -> Self {
        Self { orders, node }
    }
}

/// HTTP front end of the bridge.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &BridgeConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(Duration::from_secs(config.timeouts.request_secs), state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(request_timeout: Duration, state: AppState) -> Router {
        Router::new()
            .route("/api/v1/orders", post(place_order))
            .route("/health", get(health))
            .with_state(state)
            .layer(TimeoutLayer::new(request_timeout))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::{
        ChainError, ChainResult, SignedTransaction, StorageOrderRequest, UnsignedTx,
    };
    use crate::blockchain::{derive_credential, Subscription};
    use crate::orders::OrderPipeline;
    use crate::pinning::{PinningResult, PinningService};
    use alloy::primitives::Address;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct OfflineNode;

    #[async_trait]
    impl ChainNode for OfflineNode {
        async fn build_place_order_tx(&self, _: &StorageOrderRequest) -> ChainResult<UnsignedTx> {
            Err(ChainError::NotConnected)
        }
        async fn submit(&self, _: &SignedTransaction) -> ChainResult<Subscription> {
            Err(ChainError::NotConnected)
        }
        async fn current_nonce(&self, _: Address) -> ChainResult<u64> {
            Err(ChainError::NotConnected)
        }
        async fn is_healthy(&self) -> bool {
            false
        }
    }

    struct NoPinning;

    #[async_trait]
    impl PinningService for NoPinning {
        async fn ensure_pinned(&self, _: &str) -> PinningResult<()> {
            Ok(())
        }
        async fn stat_size(&self, _: &str) -> PinningResult<u64> {
            Ok(1)
        }
    }

    fn app() -> Router {
        let node: Arc<dyn ChainNode> = Arc::new(OfflineNode);
        let credential =
            derive_credential("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
                .unwrap();
        let orders = OrderService::new(Arc::new(NoPinning), OrderPipeline::new(node.clone()), credential);
        HttpServer::new(&BridgeConfig::default(), AppState::new(Arc::new(orders), node)).router
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let res = app()
            .oneshot(
                Request::get("/health")
                    .header("x-request-id", "abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(res.headers()["x-request-id"], "abc");
    }

    #[tokio::test]
    async fn test_chain_failure_is_unavailable() {
        let res = app()
            .oneshot(
                Request::post("/api/v1/orders")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"cid":"QmTest1"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(res.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let res = app()
            .oneshot(Request::get("/api/v1/quote").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
