use std::fmt;

use crate::models::{WeatherApiErrorEnvelope, WeatherObservation};
use crate::telemetry;

/// WeatherAPI reports failures inside a 200 body as `{"error":{...}}`;
/// the same substring search used for ViaCEP catches the envelope's key.
const ERROR_MARKER: &str = "erro";

/// How a weather lookup failed.
#[derive(Debug, Clone)]
pub enum WeatherLookupError {
    /// The provider returned its error envelope; carries the provider's message.
    Provider(String),
    /// Network failure before a response body was obtained.
    Transport(String),
    /// The body was neither an observation nor a decodable error envelope.
    Decode(String),
}

impl fmt::Display for WeatherLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherLookupError::Provider(msg) => write!(f, "{}", msg),
            WeatherLookupError::Transport(msg) => write!(f, "{}", msg),
            WeatherLookupError::Decode(msg) => write!(f, "{}", msg),
        }
    }
}

/// Client for the WeatherAPI current-conditions service.
#[derive(Clone)]
pub struct WeatherApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    /// Creates a new `WeatherApiClient` over a shared HTTP client.
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// Fetches current conditions for a city name.
    pub async fn current(&self, city: &str) -> Result<WeatherObservation, WeatherLookupError> {
        // Build URL with proper parameter encoding; city names carry spaces
        // and accented characters.
        let url = reqwest::Url::parse_with_params(
            &format!("{}/v1/current.json", self.base_url),
            &[("key", self.api_key.as_str()), ("q", city)],
        )
        .map_err(|e| WeatherLookupError::Transport(format!("Failed to build URL: {}", e)))?;

        // Redact key from logs to prevent credential exposure
        tracing::debug!(
            "Fetching weather: {}/v1/current.json?key=[REDACTED]&q={}",
            self.base_url,
            city
        );

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

        if body.contains(ERROR_MARKER) {
            let envelope: WeatherApiErrorEnvelope = serde_json::from_str(&body)
                .map_err(|e| WeatherLookupError::Decode(e.to_string()))?;
            tracing::warn!(
                "WeatherAPI error {} for {}: {}",
                envelope.error.code,
                city,
                envelope.error.message
            );
            return Err(WeatherLookupError::Provider(envelope.error.message));
        }

        serde_json::from_str(&body).map_err(|e| WeatherLookupError::Decode(e.to_string()))
    }
}
