//! Storage Order Bridge Library

pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod orders;
pub mod pinning;
pub mod resilience;

pub use config::schema::BridgeConfig;
pub use http::HttpServer;
pub use lifecycle::{AppContext, Shutdown};
pub use orders::OrderService;
