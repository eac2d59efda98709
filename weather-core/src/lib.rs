//! Core library for the city weather handler.
//!
//! This crate defines:
//! - Configuration of the upstream provider (environment or config file)
//! - Inbound/outbound proxy event types and the fixed CORS response headers
//! - The error taxonomy and its mapping onto HTTP status codes
//! - Abstraction over weather providers, with the RapidAPI forecast implementation
//! - `WeatherHandler`, which turns one request into one response
//!
//! It is used by `weather-lambda` and `weather-cli`.

pub mod config;
pub mod error;
pub mod handler;
pub mod model;
pub mod provider;
pub mod request;
pub mod response;

pub use config::Config;
pub use error::{ErrorBody, HandlerError, ProviderError};
pub use handler::WeatherHandler;
pub use model::{Conditions, WeatherReport};
pub use provider::{WeatherProvider, provider_from_config, rapidapi::RapidApiProvider};
pub use request::ProxyRequest;
pub use response::{CORS_HEADERS, ProxyResponse};
