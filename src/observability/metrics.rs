//! Metrics collection and exposition.
//!
//! # Metrics
//! - `orders_total` (counter): orders by terminal outcome or error kind
//! - `order_duration_seconds` (histogram): pin-to-outcome latency
//! - `pinning_requests_total` (counter): pinning calls by operation and result
//! - `chain_subscriptions_active` (gauge): open transaction subscriptions

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished order attempt.
pub fn record_order(outcome: &'static str, start: Instant) {
    counter!("orders_total", "outcome" => outcome).increment(1);
    histogram!("order_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record a pinning service call.
pub fn record_pinning(op: &'static str, success: bool) {
    let result = if success { "ok" } else { "error" };
    counter!("pinning_requests_total", "op" => op, "result" => result).increment(1);
}

/// Track subscription open/close.
pub fn subscription_opened() {
    gauge!("chain_subscriptions_active").increment(1.0);
}

pub fn subscription_closed() {
    gauge!("chain_subscriptions_active").decrement(1.0);
}
