//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirect_requests_total` (counter): redirects by language, fallback
//! - `redirect_request_duration_seconds` (histogram): handler latency
//! - `redirect_config_reloads_total` (counter): reload attempts by result

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder};

const DURATION_BUCKETS: &[f64] = &[0.000_05, 0.0001, 0.000_25, 0.0005, 0.001, 0.0025, 0.005, 0.01];

/// Install the Prometheus exporter and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .set_buckets_for_metric(
            Matcher::Full("redirect_request_duration_seconds".to_string()),
            DURATION_BUCKETS,
        )?
        .install()?;

    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one resolved redirect.
pub fn record_redirect(language: &str, fallback: bool, start: Instant) {
    ::metrics::counter!(
        "redirect_requests_total",
        "language" => language.to_string(),
        "fallback" => if fallback { "true" } else { "false" }
    )
    .increment(1);
    ::metrics::histogram!("redirect_request_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

pub fn record_reload(success: bool) {
    ::metrics::counter!(
        "redirect_config_reloads_total",
        "result" => if success { "ok" } else { "error" }
    )
    .increment(1);
}
