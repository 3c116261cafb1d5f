//! Metrics collection and exposition.
//!
//! # Metrics
//! - `vhost_translations_total` (counter): requests by outcome
//!   (`computed`, `fallback`, `other_stage`, `declined`)
//! - `vhost_translation_duration_seconds` (histogram): time spent translating
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Recording is a no-op until an exporter is installed

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter, serving scrapes on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one translated request.
pub fn record_translation(outcome: &'static str, start: Instant) {
    metrics::counter!("vhost_translations_total", "outcome" => outcome).increment(1);
    metrics::histogram!("vhost_translation_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}
