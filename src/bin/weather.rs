use std::sync::Arc;

use cep_weather_api::config::Config;
use cep_weather_api::handlers::{self, WeatherState};
use cep_weather_api::metrics::HttpMetrics;
use cep_weather_api::pipeline::TemperaturePipeline;
use cep_weather_api::telemetry;
use cep_weather_api::viacep::ViaCepClient;
use cep_weather_api::weatherapi::WeatherApiClient;

/// Weather service: runs the full CEP → address → weather → report
/// pipeline for the CEP in the query string.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let tracer_provider = telemetry::init("weather-service", &config)?;
    tracing::info!("Configuration loaded successfully");

    let api_key = config.require_weather_api_key()?;

    // Single long-lived HTTP client; clones share the connection pool.
    let http = reqwest::Client::new();

    let pipeline = TemperaturePipeline::new(
        ViaCepClient::new(http.clone(), config.viacep_base_url.clone()),
        WeatherApiClient::new(http, config.weather_api_base_url.clone(), api_key),
        config.span_per_stage,
    );
    let state = Arc::new(WeatherState { pipeline });

    let metrics = Arc::new(HttpMetrics::new("weather_service")?);
    let app = handlers::weather_router(state, metrics, config.request_timeout());

    let addr = format!("0.0.0.0:{}", config.weather_service_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Weather service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    telemetry::shutdown(tracer_provider, config.shutdown_grace()).await;
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining in-flight requests");
}
