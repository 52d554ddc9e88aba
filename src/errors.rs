use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::viacep::CepLookupError;
use crate::weatherapi::WeatherLookupError;

/// Application-specific error types.
///
/// Every failure path converts into a definite HTTP status with a short
/// plain-text body; nothing is retried and nothing is swallowed.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Request body missing, undecodable, or carrying an empty CEP (CEP service).
    InvalidBody,
    /// `cep` query parameter missing or empty (weather service).
    MissingCep,
    /// CEP failed the format check.
    InvalidZipcode,
    /// ViaCEP signaled its not-found marker for the CEP.
    ZipcodeNotFound,
    /// Address lookup failed in transit or while decoding.
    CepLookup(CepLookupError),
    /// Weather resolution failed, upstream or downstream.
    WeatherLookup(WeatherLookupError),
    /// Internal server error.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidBody => write!(f, "CEP is required"),
            AppError::MissingCep => write!(f, "Cep is required"),
            AppError::InvalidZipcode => write!(f, "invalid zipcode"),
            AppError::ZipcodeNotFound => write!(f, "can not find zipcode"),
            AppError::CepLookup(e) => write!(f, "Error getting CEP info: {}", e),
            AppError::WeatherLookup(e) => write!(f, "Error getting weather info: {}", e),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Weather-lookup failures map to 500 uniformly, even when the trigger
    /// was plausibly client-supplied input such as an ungeocodable city;
    /// that is the upstream contract's status mapping, preserved as-is.
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InvalidBody => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::MissingCep => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::InvalidZipcode => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::ZipcodeNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::CepLookup(e) => {
                tracing::error!("CEP lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::WeatherLookup(e) => {
                tracing::error!("Weather lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        (status, body).into_response()
    }
}

impl From<CepLookupError> for AppError {
    /// Converts an address-lookup failure into its response classification.
    ///
    /// The provider's not-found marker terminates the pipeline with 404;
    /// transport and decode failures surface as 500.
    fn from(err: CepLookupError) -> Self {
        match err {
            CepLookupError::NotFound => AppError::ZipcodeNotFound,
            other => AppError::CepLookup(other),
        }
    }
}

impl From<WeatherLookupError> for AppError {
    fn from(err: WeatherLookupError) -> Self {
        AppError::WeatherLookup(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn status_mapping_matches_contract() {
        assert_eq!(status_of(AppError::InvalidBody), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::MissingCep), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(AppError::InvalidZipcode),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(AppError::ZipcodeNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::CepLookup(CepLookupError::Transport(
                "connection refused".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(AppError::WeatherLookup(WeatherLookupError::Provider(
                "No matching location found.".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_from_lookup_error() {
        let err: AppError = CepLookupError::NotFound.into();
        assert!(matches!(err, AppError::ZipcodeNotFound));
        assert_eq!(err.to_string(), "can not find zipcode");
    }

    #[test]
    fn lookup_failures_carry_stage_labels() {
        let cep_err: AppError = CepLookupError::Decode("unexpected token".to_string()).into();
        assert!(cep_err.to_string().starts_with("Error getting CEP info: "));

        let weather_err: AppError =
            WeatherLookupError::Transport("connection reset".to_string()).into();
        assert!(weather_err
            .to_string()
            .starts_with("Error getting weather info: "));
    }
}
