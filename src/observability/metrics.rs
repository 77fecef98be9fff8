//! Metrics collection and exposition.
//!
//! # Metrics
//! - `vp_profile_lookups_total` (counter): profile lookups by outcome
//! - `vp_profile_lookup_duration_seconds` (histogram): profile API latency
//! - `vp_balance_fetches_total` (counter): balance refreshes by outcome
//! - `vp_withdrawals_total` (counter): withdrawals by token, outcome
//! - `vp_rpc_healthy` (gauge): 1=reachable, 0=unreachable

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_profile_lookup(outcome: &'static str, start: Instant) {
    counter!("vp_profile_lookups_total", "outcome" => outcome).increment(1);
    histogram!("vp_profile_lookup_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_balance_fetch(outcome: &'static str) {
    counter!("vp_balance_fetches_total", "outcome" => outcome).increment(1);
}

pub fn record_withdrawal(token: &str, outcome: &'static str) {
    counter!("vp_withdrawals_total", "token" => token.to_string(), "outcome" => outcome)
        .increment(1);
}

pub fn record_rpc_health(healthy: bool) {
    gauge!("vp_rpc_healthy").set(if healthy { 1.0 } else { 0.0 });
}
