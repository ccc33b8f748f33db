//! Startup orchestration.
//!
//! # Responsibilities
//! - Derive the signing credential once
//! - Open the shared chain node connection
//! - Build the pinning client and the order service on top of both
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The credential is derived before any network access

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::blockchain::client::ChainNode;
use crate::blockchain::types::ChainError;
use crate::blockchain::wallet::Credential;
use crate::blockchain::ws::WsChainNode;
use crate::config::BridgeConfig;
use crate::http::AppState;
use crate::orders::{OrderPipeline, OrderService, SubmissionQueue};
use crate::pinning::{IpfsPinningClient, PinningError, PinningService};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("chain setup failed: {0}")]
    Chain(#[from] ChainError),

    #[error("pinning setup failed: {0}")]
    Pinning(#[from] PinningError),
}

/// Long-lived collaborators shared by every request.
pub struct AppContext {
    pub config: BridgeConfig,
    pub node: Arc<dyn ChainNode>,
    pub orders: Arc<OrderService>,
    connection: Option<Arc<WsChainNode>>,
}

impl AppContext {
    /// Initialize every collaborator from `config`.
    pub async fn init(config: BridgeConfig) -> Result<Self, StartupError> {
        let credential = Credential::from_env(&config.signer.seed_env)?;
        tracing::info!(account = %credential.address(), "Signing credential loaded");

        let connection = Arc::new(WsChainNode::connect(&config.chain).await?);
        let pinning = Arc::new(IpfsPinningClient::new(&config.pinning, config.retries.clone())?);

        let node: Arc<dyn ChainNode> = connection.clone();
        let mut context = Self::assemble(config, node, pinning, credential);
        context.connection = Some(connection);
        Ok(context)
    }

    /// Wire the order service from already constructed collaborators.
    pub fn assemble(
        config: BridgeConfig,
        node: Arc<dyn ChainNode>,
        pinning: Arc<dyn PinningService>,
        credential: Credential,
    ) -> Self {
        let mut pipeline =
            OrderPipeline::new(node.clone()).with_replica_count(config.chain.replica_count);
        if config.orders.serialize_submissions {
            pipeline = pipeline.with_submission_queue(Arc::new(SubmissionQueue::new()));
        }

        let orders = OrderService::new(pinning, pipeline, credential)
            .with_observe_timeout(config.orders.observe_timeout_secs.map(Duration::from_secs));

        tracing::debug!(orders = ?orders, "Order service assembled");

        Self {
            config,
            node,
            orders: Arc::new(orders),
            connection: None,
        }
    }

    /// State handed to the HTTP handlers.
    pub fn state(&self) -> AppState {
        AppState::new(self.orders.clone(), self.node.clone())
    }

    /// Close the shared chain connection.
    pub async fn shutdown(&self) {
        if let Some(connection) = &self.connection {
            connection.shutdown().await;
            tracing::info!("Chain connection closed");
        }
    }
}
