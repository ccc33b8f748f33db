//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Derive credential → Connect chain node
//!     → Build pinning client → Assemble order service
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain requests → Close chain connection
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then collaborators, then the listener
//! - The chain connection outlives the HTTP server and is torn down last

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::spawn_signal_listener;
pub use startup::{AppContext, StartupError};
