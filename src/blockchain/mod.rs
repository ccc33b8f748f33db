//! Chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment variable (seed)
//!     → wallet.rs (credential derivation, signing)
//!     → transaction.rs (encode place-order call, bind nonce, sign)
//!     → client.rs (ChainNode trait, Subscription handle)
//!     → ws.rs (shared WebSocket JSON-RPC connection)
//!     → observer.rs (status stream → OrderOutcome)
//! ```
//!
//! # Security Constraints
//! - Seeds ONLY from environment variables
//! - Never log seeds or key material
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod observer;
pub mod transaction;
pub mod types;
pub mod wallet;
pub mod ws;

pub use client::{ChainNode, Subscription};
pub use observer::observe;
pub use types::{
    ChainConfig, ChainError, ChainEvent, ChainNotification, ChainResult, OrderOutcome,
    SignedTransaction, StorageOrderRequest, TxStatus, UnsignedTx,
};
pub use wallet::{derive_credential, Credential};
pub use ws::WsChainNode;
