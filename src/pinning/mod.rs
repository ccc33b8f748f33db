//! Pinning service integration.
//!
//! # Data Flow
//! ```text
//! content identifier
//!     → client.rs ensure_pinned (pin/add)
//!     → client.rs stat_size (object/stat → CumulativeSize)
//!     → size handed to the order pipeline
//! ```
//!
//! Every HTTP call goes through `resilience::retries::with_retry`.

pub mod client;
pub mod types;

pub use client::{IpfsPinningClient, PinningService};
pub use types::{PinningError, PinningResult};
