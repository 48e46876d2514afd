//! Prometheus metrics

use std::net::SocketAddr;
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Proxied call to the upstream API
    Upstream,
}

/// How a proxied request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyOutcome {
    /// Upstream answered and its response was relayed
    Relayed,
    /// OPTIONS answered locally
    Preflight,
    /// Rejected for missing credentials
    Unauthorized,
    /// Method not allowed
    Rejected,
    /// Signing, URL or network failure
    Failed,
}

impl ProxyOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyOutcome::Relayed => "relayed",
            ProxyOutcome::Preflight => "preflight",
            ProxyOutcome::Unauthorized => "unauthorized",
            ProxyOutcome::Rejected => "rejected",
            ProxyOutcome::Failed => "failed",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = match metric {
        LatencyMetric::Upstream => "kalshi_gateway_upstream_latency_ms",
    };

    metrics::histogram!(metric_name).record(duration.as_secs_f64() * 1000.0);
}

/// Count a proxied request by method and outcome
pub fn record_proxy_request(method: &str, outcome: ProxyOutcome) {
    metrics::counter!(
        "kalshi_gateway_proxy_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Install the Prometheus exporter on `0.0.0.0:{port}`
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}
