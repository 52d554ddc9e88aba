use tracing::Instrument;

use crate::cep::is_valid_cep;
use crate::errors::AppError;
use crate::models::{TemperatureReport, WeatherObservation};
use crate::viacep::ViaCepClient;
use crate::weatherapi::WeatherApiClient;

/// The CEP → address → weather → report pipeline of the weather service.
///
/// Stages run strictly in sequence, since the weather lookup needs the
/// address lookup's city, and the first failure terminates the run. No
/// retries; the ambient request timeout is enforced outside the pipeline.
#[derive(Clone)]
pub struct TemperaturePipeline {
    viacep: ViaCepClient,
    weather: WeatherApiClient,
    span_per_stage: bool,
}

impl TemperaturePipeline {
    /// Creates a pipeline over the two lookup clients.
    ///
    /// With `span_per_stage` set, the address and weather resolutions each
    /// get their own child span; otherwise the enclosing request span is
    /// the only traced unit.
    pub fn new(viacep: ViaCepClient, weather: WeatherApiClient, span_per_stage: bool) -> Self {
        Self {
            viacep,
            weather,
            span_per_stage,
        }
    }

    /// Resolves a CEP to its temperature report.
    pub async fn resolve(&self, cep: &str) -> Result<TemperatureReport, AppError> {
        if !is_valid_cep(cep) {
            return Err(AppError::InvalidZipcode);
        }

        let address = if self.span_per_stage {
            self.viacep
                .lookup(cep)
                .instrument(tracing::info_span!("viacep lookup"))
                .await?
        } else {
            self.viacep.lookup(cep).await?
        };

        let observation = if self.span_per_stage {
            self.weather
                .current(&address.localidade)
                .instrument(tracing::info_span!("weatherapi lookup"))
                .await?
        } else {
            self.weather.current(&address.localidade).await?
        };

        Ok(compose_report(observation))
    }
}

/// Derive Kelvin from Celsius.
///
/// The offset is 273 exactly, not 273.15. That is the upstream contract
/// this service reproduces.
pub fn kelvin_from_celsius(temp_c: f64) -> f64 {
    temp_c + 273.0
}

/// Build the final report from an observation. Celsius and Fahrenheit are
/// the provider's own readings, untouched; only Kelvin is derived.
pub fn compose_report(observation: WeatherObservation) -> TemperatureReport {
    TemperatureReport {
        city: observation.location.name,
        temp_c: observation.current.temp_c,
        temp_f: observation.current.temp_f,
        temp_k: kelvin_from_celsius(observation.current.temp_c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrentConditions, WeatherLocation};

    #[test]
    fn kelvin_offset_is_273_exactly() {
        assert_eq!(kelvin_from_celsius(25.0), 298.0);
        assert_eq!(kelvin_from_celsius(0.0), 273.0);
        assert_eq!(kelvin_from_celsius(-273.0), 0.0);
    }

    #[test]
    fn report_passes_fahrenheit_through() {
        let observation = WeatherObservation {
            location: WeatherLocation {
                name: "São Paulo".to_string(),
            },
            // temp_f deliberately inconsistent with temp_c: the provider's
            // value must survive untouched.
            current: CurrentConditions {
                temp_c: 25.0,
                temp_f: 80.5,
            },
        };

        let report = compose_report(observation);
        assert_eq!(report.city, "São Paulo");
        assert_eq!(report.temp_c, 25.0);
        assert_eq!(report.temp_f, 80.5);
        assert_eq!(report.temp_k, 298.0);
    }
}
