use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::Instrument;

use crate::cep::is_valid_cep;
use crate::downstream::DownstreamWeatherClient;
use crate::errors::AppError;
use crate::metrics::{self, HttpMetrics};
use crate::models::{CepInput, TemperatureReport, WeatherQuery};
use crate::pipeline::TemperaturePipeline;
use crate::telemetry;
use crate::viacep::ViaCepClient;

/// Shared state of the CEP service.
#[derive(Clone)]
pub struct CepState {
    /// Address-lookup client.
    pub viacep: ViaCepClient,
    /// Client for the downstream weather service.
    pub downstream: DownstreamWeatherClient,
}

/// Shared state of the weather service.
#[derive(Clone)]
pub struct WeatherState {
    /// The full CEP → report pipeline.
    pub pipeline: TemperaturePipeline,
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /
///
/// CEP service entrypoint: validates the CEP from the JSON body, resolves
/// its address, then delegates the weather half to the downstream service
/// and returns that report verbatim.
///
/// An undecodable body, an absent `cep` field, or an empty value is 400
/// before validation runs; a present-but-malformed CEP is 422.
pub async fn resolve_cep(
    State(state): State<Arc<CepState>>,
    headers: HeaderMap,
    payload: Result<Json<CepInput>, JsonRejection>,
) -> Result<Json<TemperatureReport>, AppError> {
    let span = tracing::info_span!("cep request");
    telemetry::set_parent_from_headers(&span, &headers);

    async move {
        let Json(input) = payload.map_err(|_| AppError::InvalidBody)?;
        if input.cep.is_empty() {
            return Err(AppError::InvalidBody);
        }
        if !is_valid_cep(&input.cep) {
            return Err(AppError::InvalidZipcode);
        }

        let address = state
            .viacep
            .lookup(&input.cep)
            .instrument(tracing::info_span!("viacep lookup"))
            .await?;

        // Forward the resolved CEP, not the raw input: ViaCEP returns the
        // canonical hyphenated form.
        let report = state
            .downstream
            .fetch(&address.cep)
            .instrument(tracing::info_span!("weather forward"))
            .await?;

        tracing::info!("Resolved CEP {} to {}", input.cep, report.city);
        Ok(Json(report))
    }
    .instrument(span)
    .await
}

/// GET /?cep=<string>
///
/// Weather service entrypoint: runs the full pipeline for the CEP in the
/// query string. A missing or empty parameter is 400; validation and the
/// lookups report through the pipeline's own mapping.
pub async fn find_temperature(
    State(state): State<Arc<WeatherState>>,
    headers: HeaderMap,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<TemperatureReport>, AppError> {
    let span = tracing::info_span!("weather request");
    telemetry::set_parent_from_headers(&span, &headers);

    async move {
        let cep = query.cep.unwrap_or_default();
        if cep.is_empty() {
            return Err(AppError::MissingCep);
        }

        let report = state.pipeline.resolve(&cep).await?;
        tracing::info!("Resolved CEP {} to {}", cep, report.city);
        Ok(Json(report))
    }
    .instrument(span)
    .await
}

/// Router of the CEP service: the pipeline route plus health check,
/// metrics scrape, and the common middleware stack.
pub fn cep_router(
    state: Arc<CepState>,
    metrics: Arc<HttpMetrics>,
    request_timeout: Duration,
) -> Router {
    Router::new()
        .route("/", post(resolve_cep))
        .with_state(state)
        .merge(common_routes(metrics.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(DefaultBodyLimit::max(64 * 1024))
                .layer(axum::middleware::from_fn_with_state(metrics, metrics::track))
                .layer(CorsLayer::permissive()),
        )
}

/// Router of the weather service.
pub fn weather_router(
    state: Arc<WeatherState>,
    metrics: Arc<HttpMetrics>,
    request_timeout: Duration,
) -> Router {
    Router::new()
        .route("/", get(find_temperature))
        .with_state(state)
        .merge(common_routes(metrics.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(DefaultBodyLimit::max(64 * 1024))
                .layer(axum::middleware::from_fn_with_state(metrics, metrics::track))
                .layer(CorsLayer::permissive()),
        )
}

/// Routes both services expose: health check and metrics scrape.
fn common_routes(metrics: Arc<HttpMetrics>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(move || async move { metrics.render() }))
}
