//! Prometheus request metrics.
//!
//! Each process carries its own registry, exposed at `GET /metrics` in text
//! exposition format. Collected per service (prefix is the service name):
//! - `<prefix>_http_requests_total`: total HTTP requests (counter)
//! - `<prefix>_http_request_duration_seconds`: request latency (histogram)
//! - `<prefix>_http_requests_in_flight`: current in-flight requests (gauge)

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

pub struct HttpMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
    in_flight: IntGauge,
}

impl HttpMetrics {
    /// Creates and registers the metric families under a service prefix.
    pub fn new(prefix: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(
                format!("{}_http_requests_total", prefix),
                "Total HTTP requests",
            ),
            &["method", "path", "status"],
        )?;
        registry.register(Box::new(requests_total.clone()))?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                format!("{}_http_request_duration_seconds", prefix),
                "HTTP request latency in seconds",
            ),
            &["method", "path"],
        )?;
        registry.register(Box::new(request_duration.clone()))?;

        let in_flight = IntGauge::new(
            format!("{}_http_requests_in_flight", prefix),
            "HTTP requests currently being served",
        )?;
        registry.register(Box::new(in_flight.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration,
            in_flight,
        })
    }

    /// Renders the registry in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = TextEncoder::new().encode(&metric_families, &mut buffer) {
            tracing::error!("Failed to encode metrics: {}", e);
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// axum middleware recording counter, latency, and in-flight gauge for
/// every request passing through the router.
pub async fn track(
    State(metrics): State<Arc<HttpMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    metrics.in_flight.inc();
    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();
    metrics.in_flight.dec();

    metrics
        .request_duration
        .with_label_values(&[&method, &path])
        .observe(elapsed);
    metrics
        .requests_total
        .with_label_values(&[&method, &path, response.status().as_str()])
        .inc();

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_registered_families_after_use() {
        let metrics = HttpMetrics::new("test_service").unwrap();
        metrics
            .requests_total
            .with_label_values(&["GET", "/", "200"])
            .inc();

        let rendered = metrics.render();
        assert!(rendered.contains("test_service_http_requests_total"));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let metrics = HttpMetrics::new("dup").unwrap();
        let clone = IntCounterVec::new(
            Opts::new("dup_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )
        .unwrap();
        assert!(metrics.registry.register(Box::new(clone)).is_err());
    }
}
