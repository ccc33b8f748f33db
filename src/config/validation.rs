//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, attempts > 0)
//! - Validate endpoint URLs and bind addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::BridgeConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    match url::Url::parse(&config.pinning.endpoint) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
        _ => errors.push(ValidationError::new(
            "pinning.endpoint",
            format!("'{}' is not an http(s) URL", config.pinning.endpoint),
        )),
    }

    if config.pinning.request_timeout_secs == 0 {
        errors.push(ValidationError::new("pinning.request_timeout_secs", "must be > 0"));
    }

    match url::Url::parse(&config.chain.ws_url) {
        Ok(u) if u.scheme() == "ws" || u.scheme() == "wss" => {}
        _ => errors.push(ValidationError::new(
            "chain.ws_url",
            format!("'{}' is not a ws(s) URL", config.chain.ws_url),
        )),
    }

    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be > 0"));
    }

    if config.signer.seed_env.trim().is_empty() {
        errors.push(ValidationError::new("signer.seed_env", "must name an environment variable"));
    }

    if config.orders.observe_timeout_secs == Some(0) {
        errors.push(ValidationError::new(
            "orders.observe_timeout_secs",
            "must be > 0 (omit it to wait without a deadline)",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if let Some(observe) = config.orders.observe_timeout_secs {
        if observe >= config.timeouts.request_secs {
            errors.push(ValidationError::new(
                "orders.observe_timeout_secs",
                "must be shorter than timeouts.request_secs",
            ));
        }
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be >= 1"));
    }

    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
