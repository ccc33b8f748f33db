//! Storage order placement.
//!
//! # Data Flow
//! ```text
//! cid
//!     → service.rs (validate, ensure pinned, measure size, deadline)
//!     → pipeline.rs (build tx, nonce, sign, submit)
//!     → blockchain::observer (status stream → OrderOutcome)
//!     → PlacedOrder back to the caller
//! ```
//!
//! # Design Decisions
//! - Nothing here is idempotent: every call is a new nonce and a new order
//! - The pipeline does not serialize nonces; `queue.rs` does, when installed

pub mod pipeline;
pub mod queue;
pub mod service;
pub mod types;

pub use pipeline::OrderPipeline;
pub use queue::SubmissionQueue;
pub use service::OrderService;
pub use types::{OrderError, OrderResult, PlacedOrder};
