/// Property-based tests using proptest
/// Invariants of the CEP validator and the temperature composition.
use proptest::prelude::*;

use cep_weather_api::cep::is_valid_cep;
use cep_weather_api::models::{CurrentConditions, WeatherLocation, WeatherObservation};
use cep_weather_api::pipeline::{compose_report, kelvin_from_celsius};

// Property: validation should never panic
proptest! {
    #[test]
    fn cep_validation_never_panics(cep in "\\PC*") {
        let _ = is_valid_cep(&cep);
    }
}

// Property: every well-formed CEP is accepted, in both renderings
proptest! {
    #[test]
    fn well_formed_ceps_accepted(prefix in "[0-9]{5}", suffix in "[0-9]{3}", hyphen in proptest::bool::ANY) {
        let cep = if hyphen {
            format!("{}-{}", prefix, suffix)
        } else {
            format!("{}{}", prefix, suffix)
        };
        prop_assert!(is_valid_cep(&cep), "well-formed CEP rejected: {}", cep);
    }
}

// Property: wrong shapes are rejected
proptest! {
    #[test]
    fn wrong_digit_counts_rejected(digits in "[0-9]{0,7}") {
        // Up to seven digits can never satisfy five-plus-three.
        prop_assert!(!is_valid_cep(&digits), "short CEP accepted: {}", digits);
    }

    #[test]
    fn overlong_digit_runs_rejected(digits in "[0-9]{9,16}") {
        prop_assert!(!is_valid_cep(&digits), "overlong CEP accepted: {}", digits);
    }

    #[test]
    fn misplaced_hyphen_rejected(prefix_len in 0usize..=8, cep in "[0-9]{8}") {
        // A hyphen anywhere but after the fifth digit breaks the shape.
        prop_assume!(prefix_len != 5);
        let with_hyphen = format!("{}-{}", &cep[..prefix_len], &cep[prefix_len..]);
        prop_assert!(!is_valid_cep(&with_hyphen), "misplaced hyphen accepted: {}", with_hyphen);
    }

    #[test]
    fn letters_rejected(head in "[a-zA-Z]{5}", tail in "[0-9]{3}") {
        let cep = format!("{}-{}", head, tail);
        prop_assert!(!is_valid_cep(&cep), "alphabetic CEP accepted: {}", cep);
    }

    #[test]
    fn surrounding_whitespace_rejected(cep in "[0-9]{5}-[0-9]{3}") {
        prop_assert!(!is_valid_cep(&format!(" {}", cep)), "leading-space CEP accepted: {}", cep);
        prop_assert!(!is_valid_cep(&format!("{} ", cep)), "trailing-space CEP accepted: {}", cep);
    }
}

// Property: Kelvin derivation is the fixed 273 offset
proptest! {
    #[test]
    fn kelvin_is_celsius_plus_273(temp_c in -100.0f64..=100.0f64) {
        prop_assert_eq!(kelvin_from_celsius(temp_c), temp_c + 273.0);
    }
}

// Property: composition passes provider readings through untouched
proptest! {
    #[test]
    fn report_preserves_provider_readings(
        city in "[A-Za-z ]{1,30}",
        temp_c in -100.0f64..=100.0f64,
        temp_f in -150.0f64..=250.0f64,
    ) {
        let report = compose_report(WeatherObservation {
            location: WeatherLocation { name: city.clone() },
            current: CurrentConditions { temp_c, temp_f },
        });

        prop_assert_eq!(report.city, city);
        prop_assert_eq!(report.temp_c, temp_c);
        // Fahrenheit is never recomputed from Celsius.
        prop_assert_eq!(report.temp_f, temp_f);
        prop_assert_eq!(report.temp_k, temp_c + 273.0);
    }
}
