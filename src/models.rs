use serde::{Deserialize, Serialize};

// ============ Inbound ============

/// Request body accepted by the CEP service.
///
/// An absent `cep` field decodes to an empty string and is rejected with
/// 400 before validation runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CepInput {
    #[serde(default)]
    pub cep: String,
}

/// Query string accepted by the weather service.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherQuery {
    pub cep: Option<String>,
}

// ============ ViaCEP ============

/// Address record returned by ViaCEP for a CEP.
///
/// ViaCEP omits fields for some codes, so every field defaults to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViaCepAddress {
    /// CEP in canonical `NNNNN-NNN` form.
    pub cep: String,
    /// Street name.
    pub logradouro: String,
    /// Address complement.
    pub complemento: String,
    /// District.
    pub bairro: String,
    /// City name, fed into the weather lookup.
    pub localidade: String,
    /// Two-letter state code.
    pub uf: String,
    /// IBGE municipality code.
    pub ibge: String,
    /// GIA code.
    pub gia: String,
    /// Area dialing code.
    pub ddd: String,
    /// SIAFI code.
    pub siafi: String,
}

// ============ WeatherAPI ============

/// Current conditions as reported by WeatherAPI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WeatherObservation {
    pub location: WeatherLocation,
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WeatherLocation {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub temp_f: f64,
}

/// Error envelope WeatherAPI returns inside a 200 body.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherApiErrorEnvelope {
    pub error: WeatherApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherApiError {
    pub code: i64,
    pub message: String,
}

// ============ Outbound ============

/// Final response body: city plus the three temperature scales.
///
/// `temp_F` is the provider-supplied reading passed through unmodified;
/// only `temp_K` is derived locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReport {
    pub city: String,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viacep_address_tolerates_missing_fields() {
        let address: ViaCepAddress =
            serde_json::from_str(r#"{"cep":"01310-100","localidade":"São Paulo"}"#).unwrap();
        assert_eq!(address.cep, "01310-100");
        assert_eq!(address.localidade, "São Paulo");
        assert_eq!(address.logradouro, "");
        assert_eq!(address.ibge, "");
    }

    #[test]
    fn temperature_report_uses_scale_suffixed_keys() {
        let report = TemperatureReport {
            city: "São Paulo".to_string(),
            temp_c: 25.0,
            temp_f: 77.0,
            temp_k: 298.0,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "city": "São Paulo",
                "temp_C": 25.0,
                "temp_F": 77.0,
                "temp_K": 298.0
            })
        );
    }

    #[test]
    fn cep_input_defaults_missing_field_to_empty() {
        let input: CepInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.cep, "");
    }

    #[test]
    fn weather_error_envelope_decodes() {
        let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
        let envelope: WeatherApiErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.code, 1006);
        assert_eq!(envelope.error.message, "No matching location found.");
    }
}
