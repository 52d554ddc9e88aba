//! CEP → Weather temperature API library
//!
//! This library backs two small services built around the same lookup
//! pipeline: a CEP service that validates a Brazilian postal code, resolves
//! it to an address via ViaCEP and forwards to the weather service, and a
//! weather service that resolves current weather for the CEP's city and
//! normalizes the temperatures into Celsius/Fahrenheit/Kelvin.
//!
//! # Modules
//!
//! - `cep`: CEP format validation.
//! - `config`: Configuration management.
//! - `downstream`: Client for the downstream weather service.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers and routers.
//! - `metrics`: Prometheus request metrics.
//! - `models`: Wire-level data models.
//! - `pipeline`: CEP → address → weather → report orchestration.
//! - `telemetry`: Tracing and OTLP export setup.
//! - `viacep`: ViaCEP address lookup client.
//! - `weatherapi`: WeatherAPI current-conditions client.

pub mod cep;
pub mod config;
pub mod downstream;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod telemetry;
pub mod viacep;
pub mod weatherapi;
