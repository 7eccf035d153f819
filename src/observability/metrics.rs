//! Metrics collection and exposition.
//!
//! # Metrics
//! - `combiner_transactions_total` (counter): submissions by function, outcome
//! - `combiner_fee_fallbacks_total` (counter): fallback constants used, by kind
//! - `combiner_combine_groups_total` (counter): combine groups by outcome
//!
//! Recording is always on and costs nothing without an installed recorder.
//! The Prometheus endpoint is only started when configured.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

pub fn record_transaction(function: &'static str, outcome: &'static str) {
    metrics::counter!(
        "combiner_transactions_total",
        "function" => function,
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_fee_fallback(kind: &'static str) {
    metrics::counter!("combiner_fee_fallbacks_total", "kind" => kind).increment(1);
}

pub fn record_combine_group(outcome: &'static str) {
    metrics::counter!("combiner_combine_groups_total", "outcome" => outcome).increment(1);
}

/// Install the Prometheus recorder and its scrape listener.
///
/// Must run inside the tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}
