//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID assigned or propagated)
//!     → orders.rs (handlers → OrderService)
//!     → response.rs (outcome/error → status code + JSON body)
//!     → Send to client
//! ```

pub mod orders;
pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, X_REQUEST_ID};
pub use response::{ErrorResponse, OrderResponse};
pub use server::{AppState, HttpServer};
