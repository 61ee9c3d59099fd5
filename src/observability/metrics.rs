//! Metrics collection.
//!
//! # Metrics
//! - `ollfs_probes_total` (counter): probes by endpoint and result
//! - `ollfs_backend_health` (gauge): 1=healthy, 0=unhealthy
//! - `ollfs_healthy_servers` (gauge): size of the published healthy set
//! - `ollfs_probe_pass_duration_seconds` (histogram): wall time of a pass
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; without an installed recorder
//!   every call is a no-op
//! - Endpoint label uses the configured URI verbatim

use std::time::Duration;

/// Record the outcome of a single probe.
pub fn record_probe(endpoint: &str, healthy: bool) {
    let result = if healthy { "healthy" } else { "unhealthy" };
    metrics::counter!(
        "ollfs_probes_total",
        "endpoint" => endpoint.to_string(),
        "result" => result
    )
    .increment(1);

    metrics::gauge!("ollfs_backend_health", "endpoint" => endpoint.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

/// Record a completed pass.
pub fn record_pass(healthy: usize, elapsed: Duration) {
    metrics::gauge!("ollfs_healthy_servers").set(healthy as f64);
    metrics::histogram!("ollfs_probe_pass_duration_seconds").record(elapsed.as_secs_f64());
}
