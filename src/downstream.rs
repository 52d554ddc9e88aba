use crate::models::TemperatureReport;
use crate::telemetry;
use crate::weatherapi::WeatherLookupError;

/// Client for the downstream weather service the CEP service delegates to.
///
/// The report body comes back verbatim: it is decoded as-is and re-served
/// to the caller. The downstream status code is not inspected; an error
/// body simply fails the decode.
#[derive(Clone)]
pub struct DownstreamWeatherClient {
    client: reqwest::Client,
    base_url: String,
}

impl DownstreamWeatherClient {
    /// Creates a new `DownstreamWeatherClient` over a shared HTTP client.
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Fetches the temperature report for a resolved CEP.
    ///
    /// Trace context is injected into the outbound headers so the
    /// downstream service continues the same trace.
    pub async fn fetch(&self, cep: &str) -> Result<TemperatureReport, WeatherLookupError> {
        let url = reqwest::Url::parse_with_params(&self.base_url, &[("cep", cep)])
            .map_err(|e| WeatherLookupError::Transport(format!("Failed to build URL: {}", e)))?;
        tracing::debug!("Forwarding CEP {} to weather service: {}", cep, url);

        let response = self
            .client
            .get(url)
            .headers(telemetry::outbound_headers())
            .send()
            .await
            .map_err(|e| WeatherLookupError::Transport(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| WeatherLookupError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| WeatherLookupError::Decode(e.to_string()))
    }
}
