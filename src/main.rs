use std::sync::Arc;

use cep_weather_api::config::Config;
use cep_weather_api::downstream::DownstreamWeatherClient;
use cep_weather_api::handlers::{self, CepState};
use cep_weather_api::metrics::HttpMetrics;
use cep_weather_api::telemetry;
use cep_weather_api::viacep::ViaCepClient;

/// CEP service: validates a CEP, resolves its address via ViaCEP, and
/// delegates the weather half to the downstream weather service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let tracer_provider = telemetry::init("cep-service", &config)?;
    tracing::info!("Configuration loaded successfully");

    // Single long-lived HTTP client; clones share the connection pool.
    // The per-request deadline lives in the router's timeout layer.
    let http = reqwest::Client::new();

    let state = Arc::new(CepState {
        viacep: ViaCepClient::new(http.clone(), config.viacep_base_url.clone()),
        downstream: DownstreamWeatherClient::new(http, config.weather_service_url.clone()),
    });

    let metrics = Arc::new(HttpMetrics::new("cep_service")?);
    let app = handlers::cep_router(state, metrics, config.request_timeout());

    let addr = format!("0.0.0.0:{}", config.cep_service_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("CEP service listening on {}", addr);

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
