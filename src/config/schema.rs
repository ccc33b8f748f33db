//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the storage order bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Pinning service endpoint settings.
    pub pinning: PinningConfig,

    /// Chain node connection settings.
    pub chain: ChainConfig,

    /// Signing credential source.
    pub signer: SignerConfig,

    /// Order placement behaviour.
    pub orders: OrderConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration for pinning requests.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Pinning service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PinningConfig {
    /// Base URL of the IPFS-compatible HTTP API.
    pub endpoint: String,

    /// Optional value for the `Authorization` header (e.g. "Basic ...").
    pub auth_header: Option<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for PinningConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5001".to_string(),
            auth_header: None,
            request_timeout_secs: 30,
        }
    }
}

/// Chain node configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// WebSocket JSON-RPC endpoint.
    pub ws_url: String,

    /// Chain ID mixed into every signed payload for replay protection.
    pub chain_id: u64,

    /// Timeout for individual RPC requests in seconds.
    pub rpc_timeout_secs: u64,

    /// Replica count requested with each order (0 lets the network decide).
    pub replica_count: u32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            ws_url: "ws://127.0.0.1:9944".to_string(),
            chain_id: 1,
            rpc_timeout_secs: 10,
            replica_count: 0,
        }
    }
}

/// Signer configuration.
///
/// The seed itself never lives in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Environment variable holding the seed phrase or hex secret.
    pub seed_env: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            seed_env: "ORDER_SIGNER_SEED".to_string(),
        }
    }
}

/// Order placement configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OrderConfig {
    /// Deadline for an order to reach a terminal outcome. `None` waits forever.
    pub observe_timeout_secs: Option<u64>,

    /// Serialize nonce acquisition and submission per signing account.
    pub serialize_submissions: bool,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            observe_timeout_secs: Some(120),
            serialize_submissions: true,
        }
    }
}

/// Timeout configuration for the HTTP surface.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 180 }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 5000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
