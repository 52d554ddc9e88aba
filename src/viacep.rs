use std::fmt;

use crate::models::ViaCepAddress;
use crate::telemetry;

/// ViaCEP signals "unknown CEP" with this marker inside a 200 body
/// (`{"erro": true}`), not with a non-2xx status. The raw body is searched
/// for the marker before any structured decode.
const NOT_FOUND_MARKER: &str = "erro";

/// How an address lookup failed.
#[derive(Debug, Clone)]
pub enum CepLookupError {
    /// The provider's body carried its not-found marker.
    NotFound,
    /// Network failure before a response body was obtained.
    Transport(String),
    /// The body was not the expected address record.
    Decode(String),
}

impl fmt::Display for CepLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CepLookupError::NotFound => write!(f, "can not find zipcode"),
            CepLookupError::Transport(msg) => write!(f, "{}", msg),
            CepLookupError::Decode(msg) => write!(f, "{}", msg),
        }
    }
}

/// Client for the ViaCEP address-lookup service.
#[derive(Clone)]
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    /// Creates a new `ViaCepClient` over a shared HTTP client.
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Resolves a CEP to its address record.
    ///
    /// The CEP goes into the path as given, hyphen included and unescaped,
    /// so a validated value keeps whichever form the caller submitted.
    pub async fn lookup(&self, cep: &str) -> Result<ViaCepAddress, CepLookupError> {
        let url = format!("{}/ws/{}/json/", self.base_url, cep);
        tracing::debug!("Fetching address from ViaCEP: {}", url);

        let response = self
            .client
            .get(&url)
            .headers(telemetry::outbound_headers())
            .send()
            .await
            .map_err(|e| CepLookupError::Transport(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| CepLookupError::Transport(e.to_string()))?;

        if body.contains(NOT_FOUND_MARKER) {
            return Err(CepLookupError::NotFound);
        }

        let address: ViaCepAddress =
            serde_json::from_str(&body).map_err(|e| CepLookupError::Decode(e.to_string()))?;

        tracing::debug!("Resolved CEP {} to {}", cep, address.localidade);
        Ok(address)
    }
}
