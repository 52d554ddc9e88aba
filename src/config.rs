use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub cep_service_port: u16,
    pub weather_service_port: u16,
    pub viacep_base_url: String,
    pub weather_api_base_url: String,
    pub weather_api_key: Option<String>,
    pub weather_service_url: String,
    pub otel_service_name: Option<String>,
    pub otlp_endpoint: Option<String>,
    pub request_timeout_secs: u64,
    pub shutdown_grace_secs: u64,
    pub span_per_stage: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            cep_service_port: std::env::var("CEP_SERVICE_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| {
                    anyhow::anyhow!("CEP_SERVICE_PORT must be a valid number between 1-65535")
                })?,
            weather_service_port: std::env::var("WEATHER_SERVICE_PORT")
                .unwrap_or_else(|_| "8181".to_string())
                .parse()
                .map_err(|_| {
                    anyhow::anyhow!("WEATHER_SERVICE_PORT must be a valid number between 1-65535")
                })?,
            viacep_base_url: check_http_url(
                std::env::var("VIACEP_BASE_URL")
                    .unwrap_or_else(|_| "http://viacep.com.br".to_string()),
                "VIACEP_BASE_URL",
            )?,
            weather_api_base_url: check_http_url(
                std::env::var("WEATHER_API_BASE_URL")
                    .unwrap_or_else(|_| "http://api.weatherapi.com".to_string()),
                "WEATHER_API_BASE_URL",
            )?,
            weather_api_key: std::env::var("WEATHER_API_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            weather_service_url: check_http_url(
                std::env::var("WEATHER_SERVICE_URL")
                    .unwrap_or_else(|_| "http://weather:8181".to_string()),
                "WEATHER_SERVICE_URL",
            )?,
            otel_service_name: std::env::var("OTEL_SERVICE_NAME")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be a valid number"))?,
            shutdown_grace_secs: std::env::var("SHUTDOWN_GRACE_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SHUTDOWN_GRACE_SECS must be a valid number"))?,
            span_per_stage: std::env::var("SPAN_PER_STAGE")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        };

        tracing::debug!("ViaCEP base URL: {}", config.viacep_base_url);
        tracing::debug!("WeatherAPI base URL: {}", config.weather_api_base_url);
        tracing::debug!("Weather service URL: {}", config.weather_service_url);
        if let Some(ref endpoint) = config.otlp_endpoint {
            tracing::info!("OTLP exporter endpoint configured: {}", endpoint);
        }

        Ok(config)
    }

    /// API key for the weather provider, required by the weather service at startup.
    pub fn require_weather_api_key(&self) -> anyhow::Result<String> {
        self.weather_api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("WEATHER_API_KEY environment variable required"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

fn check_http_url(url: String, var: &str) -> anyhow::Result<String> {
    if url.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", var);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", var);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_url_check_accepts_schemes() {
        assert!(check_http_url("http://viacep.com.br".to_string(), "X").is_ok());
        assert!(check_http_url("https://api.weatherapi.com".to_string(), "X").is_ok());
    }

    #[test]
    fn http_url_check_rejects_bad_values() {
        assert!(check_http_url(String::new(), "X").is_err());
        assert!(check_http_url("viacep.com.br".to_string(), "X").is_err());
        assert!(check_http_url("ftp://host".to_string(), "X").is_err());
    }
}
