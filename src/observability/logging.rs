//! Structured logging.
//!
//! Uses `tracing-subscriber` with an `EnvFilter`. `RUST_LOG` wins over the
//! configured level when set.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Build the default filter directive for a configured level.
pub fn default_directive(level: &str) -> String {
    format!("storage_order_bridge={level},tower_http={level}")
}

/// Initialize the global tracing subscriber.
///
/// Calling this twice is harmless; the second attempt is ignored.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(&config.log_level).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
