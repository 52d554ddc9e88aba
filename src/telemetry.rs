//! Tracing and OpenTelemetry setup.
//!
//! Logs go through `tracing`/`tracing-subscriber`; spans are exported via
//! OTLP gRPC when `OTEL_EXPORTER_OTLP_ENDPOINT` is configured. Trace
//! context crosses process boundaries as W3C `traceparent` headers.

use std::time::Duration;

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::{
    global,
    propagation::{Extractor, Injector},
    trace::TracerProvider as _,
    KeyValue,
};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    propagation::TraceContextPropagator,
    trace::{Sampler, SdkTracerProvider},
    Resource,
};
use tracing_opentelemetry::OpenTelemetrySpanExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Initialize logging and, when an OTLP endpoint is configured, tracing
/// export. Returns the tracer provider so the caller can flush it on
/// shutdown. A configured endpoint that fails to build is fatal.
pub fn init(default_service_name: &str, config: &Config) -> anyhow::Result<Option<SdkTracerProvider>> {
    // W3C propagator for trace-context extraction/injection, exporter or not.
    global::set_text_map_propagator(TraceContextPropagator::new());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cep_weather_api=debug,tower_http=debug".into());

    let Some(endpoint) = config.otlp_endpoint.clone() else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
        return Ok(None);
    };

    let service_name = config
        .otel_service_name
        .clone()
        .unwrap_or_else(|| default_service_name.to_string());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build OTLP exporter: {}", e))?;

    let resource = Resource::builder_empty()
        .with_attributes([KeyValue::new("service.name", service_name.clone())])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
        .with_resource(resource)
        .build();

    global::set_tracer_provider(provider.clone());

    let tracer = provider.tracer(service_name.clone());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_opentelemetry::OpenTelemetryLayer::new(tracer))
        .init();

    tracing::info!("OTLP span export enabled for service: {}", service_name);
    Ok(Some(provider))
}

/// Flush and shut down the tracer provider, bounded by the shutdown grace
/// period. Export loss past the deadline is logged, not fatal.
pub async fn shutdown(provider: Option<SdkTracerProvider>, grace: Duration) {
    let Some(provider) = provider else {
        return;
    };

    let shutdown = tokio::task::spawn_blocking(move || provider.shutdown());
    match tokio::time::timeout(grace, shutdown).await {
        Ok(Ok(Ok(()))) => tracing::info!("Tracer provider shut down"),
        Ok(Ok(Err(e))) => tracing::warn!("Tracer provider shutdown failed: {}", e),
        Ok(Err(e)) => tracing::warn!("Tracer provider shutdown task panicked: {}", e),
        Err(_) => tracing::warn!("Tracer provider shutdown exceeded grace period"),
    }
}

/// Adapter for extracting W3C Trace Context from HTTP headers.
struct HeadersExtractor<'a>(&'a HeaderMap);

impl<'a> Extractor for HeadersExtractor<'a> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Adapter for injecting W3C Trace Context into HTTP headers.
struct HeadersInjector<'a>(&'a mut HeaderMap);

impl<'a> Injector for HeadersInjector<'a> {
    fn set(&mut self, key: &str, value: String) {
        if let Ok(name) = HeaderName::from_bytes(key.as_bytes()) {
            if let Ok(val) = HeaderValue::from_str(&value) {
                self.0.insert(name, val);
            }
        }
    }
}

/// Set a request span's parent from the trace context carried on inbound
/// headers, continuing the caller's trace.
pub fn set_parent_from_headers(span: &tracing::Span, headers: &HeaderMap) {
    let parent_cx =
        global::get_text_map_propagator(|propagator| propagator.extract(&HeadersExtractor(headers)));
    span.set_parent(parent_cx);
}

/// Headers carrying the current span's trace context, for outbound requests.
pub fn outbound_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let cx = tracing::Span::current().context();
    global::get_text_map_propagator(|propagator| {
        propagator.inject_context(&cx, &mut HeadersInjector(&mut headers));
    });
    headers
}
